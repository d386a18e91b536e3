use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::order::{self, Entity as OrderEntity},
    entities::order_item::{self, Entity as OrderItemEntity},
    entities::ticket_counter::{Entity as CounterEntity, COUNTER_ROW_ID},
    errors::ServiceError,
    services::activity_log::ActivityLogService,
    services::orders::{model_to_response, OrderResponse},
    services::order_status::OrderStatus,
};

const TOP_ITEM_LIMIT: u64 = 5;
const RECENT_ORDER_LIMIT: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub menu_item_id: Uuid,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of totals over PAID orders. Archiving reclassifies those orders,
    /// so this resets to zero at the start of each business day.
    pub total_revenue: Decimal,
    pub total_transactions: u64,
    pub pending_count: u64,
    pub ready_count: u64,
    pub served_count: u64,
    pub top_items: Vec<TopItem>,
    pub recent_orders: Vec<OrderResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResult {
    pub archived_count: u64,
}

/// Aggregated reporting over the current business day, plus the end-of-day
/// archive sweep that closes it.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
    activity: ActivityLogService,
}

impl DashboardService {
    pub fn new(db_pool: Arc<DbPool>, activity: ActivityLogService) -> Self {
        Self { db_pool, activity }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;

        // Revenue and transaction count cover PAID orders only; archived
        // orders belong to previous days.
        let paid = OrderEntity::find()
            .filter(order::Column::Status.eq(OrderStatus::Paid.to_string()))
            .all(db)
            .await?;
        let total_revenue: Decimal = paid.iter().map(|o| o.total).sum();
        let total_transactions = paid.len() as u64;

        let status_counts: Vec<(String, i64)> = OrderEntity::find()
            .select_only()
            .column(order::Column::Status)
            .column_as(order::Column::Id.count(), "count")
            .filter(order::Column::Status.ne(OrderStatus::Archived.to_string()))
            .group_by(order::Column::Status)
            .into_tuple()
            .all(db)
            .await?;
        let count_for = |status: OrderStatus| -> u64 {
            status_counts
                .iter()
                .find(|(s, _)| *s == status.to_string())
                .map(|(_, n)| *n as u64)
                .unwrap_or(0)
        };

        let top_items: Vec<(Uuid, String, i64)> = OrderItemEntity::find()
            .select_only()
            .column(order_item::Column::MenuItemId)
            .column(order_item::Column::Name)
            .column_as(order_item::Column::Quantity.sum(), "quantity")
            .inner_join(OrderEntity)
            .filter(order::Column::Status.ne(OrderStatus::Archived.to_string()))
            .group_by(order_item::Column::MenuItemId)
            .group_by(order_item::Column::Name)
            .order_by_desc(Expr::col(order_item::Column::Quantity).sum())
            .limit(TOP_ITEM_LIMIT)
            .into_tuple()
            .all(db)
            .await?;

        let recent = OrderEntity::find()
            .filter(order::Column::Status.ne(OrderStatus::Archived.to_string()))
            .order_by_desc(order::Column::CreatedAt)
            .limit(RECENT_ORDER_LIMIT)
            .all(db)
            .await?;
        let recent_ids: Vec<Uuid> = recent.iter().map(|o| o.id).collect();
        let recent_items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(recent_ids))
            .all(db)
            .await?;

        let recent_orders = recent
            .into_iter()
            .map(|o| {
                let items = recent_items
                    .iter()
                    .filter(|i| i.order_id == o.id)
                    .cloned()
                    .collect();
                model_to_response(o, items)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DashboardStats {
            total_revenue,
            total_transactions,
            pending_count: count_for(OrderStatus::Pending),
            ready_count: count_for(OrderStatus::Ready),
            served_count: count_for(OrderStatus::Served),
            top_items: top_items
                .into_iter()
                .map(|(menu_item_id, name, quantity)| TopItem {
                    menu_item_id,
                    name,
                    quantity,
                })
                .collect(),
            recent_orders,
        })
    }

    /// End-of-day sweep: every non-ARCHIVED order becomes ARCHIVED and the
    /// ticket counter restarts at zero, all in one transaction.
    #[instrument(skip(self))]
    pub async fn archive_daily_sales(&self) -> Result<ArchiveResult, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for daily archive");
            ServiceError::DatabaseError(e)
        })?;

        let result = OrderEntity::update_many()
            .col_expr(
                order::Column::Status,
                Expr::value(OrderStatus::Archived.to_string()),
            )
            .filter(order::Column::Status.ne(OrderStatus::Archived.to_string()))
            .exec(&txn)
            .await?;

        CounterEntity::update_many()
            .col_expr(
                crate::entities::ticket_counter::Column::LastTicket,
                Expr::value(0),
            )
            .filter(crate::entities::ticket_counter::Column::Id.eq(COUNTER_ROW_ID))
            .exec(&txn)
            .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit daily archive transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            archived_count = result.rows_affected,
            "Daily sales archived, ticket numbering reset"
        );

        self.activity
            .record(
                "DAY_ARCHIVE",
                format!("Archived {} order(s), ticket counter reset", result.rows_affected),
                "Manager",
            )
            .await;

        Ok(ArchiveResult {
            archived_count: result.rows_affected,
        })
    }
}
