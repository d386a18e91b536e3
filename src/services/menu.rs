use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::menu_item::{
        self, ActiveModel as MenuActiveModel, Entity as MenuEntity, Model as MenuItemModel,
    },
    entities::order_item,
    errors::ServiceError,
    services::activity_log::ActivityLogService,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub price: Decimal,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub image_url: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Manager-facing menu CRUD.
#[derive(Clone)]
pub struct MenuService {
    db_pool: Arc<DbPool>,
    activity: ActivityLogService,
}

impl MenuService {
    pub fn new(db_pool: Arc<DbPool>, activity: ActivityLogService) -> Self {
        Self { db_pool, activity }
    }

    /// Lists the whole menu in creation order.
    #[instrument(skip(self))]
    pub async fn list_menu(&self) -> Result<Vec<MenuItemModel>, ServiceError> {
        let items = MenuEntity::find()
            .order_by_asc(menu_item::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        Ok(items)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_item(
        &self,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemModel, ServiceError> {
        request.validate()?;

        if request.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }

        let item = MenuActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.clone()),
            price: Set(request.price),
            category: Set(request.category),
            image_url: Set(request.image_url),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let model = item.insert(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, "Failed to create menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %model.id, name = %model.name, "Menu item created");

        self.activity
            .record(
                "MENU_CREATE",
                format!("Created item: {} (${})", model.name, model.price),
                "Manager",
            )
            .await;

        Ok(model)
    }

    #[instrument(skip(self, request), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        request: UpdateMenuItemRequest,
    ) -> Result<MenuItemModel, ServiceError> {
        if let Some(price) = request.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Price must not be negative".to_string(),
                ));
            }
        }

        let item = MenuEntity::find_by_id(item_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item with ID {item_id} not found"))
            })?;

        let mut active: MenuActiveModel = item.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(image_url) = request.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to update menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %updated.id, "Menu item updated");

        self.activity
            .record(
                "MENU_UPDATE",
                format!("Updated item: {} (${})", updated.name, updated.price),
                "Manager",
            )
            .await;

        Ok(updated)
    }

    /// Deletes a menu item. Items referenced by historical order lines are
    /// kept so old tickets stay resolvable; the delete is rejected with a
    /// conflict instead.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let item = MenuEntity::find_by_id(item_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item with ID {item_id} not found"))
            })?;

        let references = order_item::Entity::find()
            .filter(order_item::Column::MenuItemId.eq(item_id))
            .count(&*self.db_pool)
            .await?;

        if references > 0 {
            return Err(ServiceError::Conflict(format!(
                "Menu item '{}' is referenced by {} order line(s) and cannot be deleted",
                item.name, references
            )));
        }

        let name = item.name.clone();
        item.delete(&*self.db_pool).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to delete menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, "Menu item deleted");

        self.activity
            .record("MENU_DELETE", format!("Deleted item: {name}"), "Manager")
            .await;

        Ok(())
    }
}
