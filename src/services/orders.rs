use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::menu_item::{self, Entity as MenuEntity},
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
    },
    entities::order_item::{
        self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity,
        Model as OrderItemModel,
    },
    entities::ticket_counter::{
        ActiveModel as CounterActiveModel, Column as CounterColumn, Entity as CounterEntity,
        COUNTER_ROW_ID,
    },
    errors::ServiceError,
    services::activity_log::ActivityLogService,
    services::order_status::{check_transition, OrderStatus},
};

/// Request/Response types for the order service

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Table being served; walk-in/takeaway orders have none.
    pub table_number: Option<i32>,

    #[validate]
    pub order_items: Vec<CreateOrderLine>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLine {
    pub item_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,

    /// Cash tendered when settling the bill; activity-log only.
    pub paid_amount: Option<Decimal>,

    /// Change returned to the guest; activity-log only.
    pub change: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub ticket_number: i32,
    pub table_number: Option<i32>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderLineResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Computes tax and grand total from a subtotal, rounding each money value
/// to cents (half away from zero, like the tills round).
pub fn compute_totals(subtotal: Decimal, tax_rate: Decimal) -> (Decimal, Decimal) {
    let tax = (subtotal * tax_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total = (subtotal + tax).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    (tax, total)
}

/// Service managing the order lifecycle: creation with ticket numbering,
/// status transitions, and the active work queue.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    activity: ActivityLogService,
    tax_rate: Decimal,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, activity: ActivityLogService, tax_rate: Decimal) -> Self {
        Self {
            db_pool,
            activity,
            tax_rate,
        }
    }

    /// Creates a new order.
    ///
    /// The occupancy check, ticket-counter bump and all row inserts run in
    /// one transaction, so concurrent requests cannot double-book a table
    /// or receive duplicate ticket numbers.
    #[instrument(skip(self, request), fields(table_number = ?request.table_number))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if request.order_items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Order must have at least one item".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        // Bumping the counter first takes a write lock on its row, which
        // serializes concurrent order creations; the occupancy check below
        // cannot race against another in-flight order.
        let ticket_number = next_ticket_number(&txn).await?;

        // Reject a second active order for an occupied table.
        if let Some(table) = request.table_number {
            let existing = OrderEntity::find()
                .filter(order::Column::TableNumber.eq(table))
                .filter(order::Column::Status.is_not_in(terminal_status_strings()))
                .one(&txn)
                .await?;

            if let Some(active) = existing {
                return Err(ServiceError::Conflict(format!(
                    "Table {} already has an active order (ticket #{})",
                    table, active.ticket_number
                )));
            }
        }

        // Resolve every line against the menu; unknown items fail the order
        // instead of silently shrinking the bill.
        let item_ids: Vec<Uuid> = request.order_items.iter().map(|line| line.item_id).collect();
        let menu_items = MenuEntity::find()
            .filter(menu_item::Column::Id.is_in(item_ids.clone()))
            .all(&txn)
            .await?;

        let mut subtotal = Decimal::ZERO;
        let mut lines: Vec<OrderItemActiveModel> = Vec::with_capacity(request.order_items.len());
        for line in &request.order_items {
            let menu_item = menu_items
                .iter()
                .find(|m| m.id == line.item_id)
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "Order references unknown menu item {}",
                        line.item_id
                    ))
                })?;

            subtotal += menu_item.price * Decimal::from(line.quantity);
            lines.push(OrderItemActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                menu_item_id: Set(menu_item.id),
                name: Set(menu_item.name.clone()),
                unit_price: Set(menu_item.price),
                quantity: Set(line.quantity),
                created_at: Set(now),
            });
        }

        let (tax, total) = compute_totals(subtotal, self.tax_rate);

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            ticket_number: Set(ticket_number),
            table_number: Set(request.table_number),
            status: Set(OrderStatus::Pending.to_string()),
            subtotal: Set(subtotal),
            tax: Set(tax),
            total: Set(total),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        let mut item_models = Vec::with_capacity(lines.len());
        for line in lines {
            let model = line.insert(&txn).await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create order line in database");
                ServiceError::DatabaseError(e)
            })?;
            item_models.push(model);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            ticket_number = ticket_number,
            total = %total,
            "Order created successfully"
        );

        self.activity
            .record(
                "ORDER_CREATE",
                format!(
                    "Ticket #{} ({}) total ${}",
                    ticket_number,
                    request
                        .table_number
                        .map(|t| format!("table {t}"))
                        .unwrap_or_else(|| "no table".to_string()),
                    total
                ),
                "Waiter",
            )
            .await;

        Ok(model_to_response(order_model, item_models)?)
    }

    /// Updates an order's status with transition validation.
    #[instrument(skip(self, request), fields(order_id = %order_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {order_id} not found")))?;

        let current = stored_status(&order)?;
        check_transition(current, request.status)?;

        let ticket_number = order.ticket_number;
        let mut active: OrderActiveModel = order.into();
        active.status = Set(request.status.to_string());
        active.updated_at = Set(Some(now));

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            old_status = %current,
            new_status = %request.status,
            "Order status updated"
        );

        // Payment details are not stored on the order; the log line is the
        // only record of cash tendered and change.
        let details = match (request.status, request.paid_amount, request.change) {
            (OrderStatus::Paid, Some(paid), Some(change)) => format!(
                "Ticket #{ticket_number}: {current} -> {} (paid ${paid}, change ${change})",
                request.status
            ),
            (OrderStatus::Paid, Some(paid), None) => format!(
                "Ticket #{ticket_number}: {current} -> {} (paid ${paid})",
                request.status
            ),
            _ => format!("Ticket #{ticket_number}: {current} -> {}", request.status),
        };
        let actor = match request.status {
            OrderStatus::Ready => "Kitchen",
            OrderStatus::Served => "Waiter",
            OrderStatus::Paid => "Cashier",
            _ => "System",
        };
        self.activity.record("ORDER_STATUS", details, actor).await;

        model_to_response(updated, items)
    }

    /// Lists orders, oldest first (FIFO service order).
    ///
    /// Without a filter this is the active work queue: everything that is
    /// neither PAID nor ARCHIVED. With a filter it is an exact status match.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status_filter: Option<OrderStatus>,
    ) -> Result<Vec<OrderResponse>, ServiceError> {
        let query = match status_filter {
            Some(status) => {
                OrderEntity::find().filter(order::Column::Status.eq(status.to_string()))
            }
            None => OrderEntity::find()
                .filter(order::Column::Status.is_not_in(terminal_status_strings())),
        };

        let orders = query
            .order_by_asc(order::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .all(&*self.db_pool)
            .await?;

        orders
            .into_iter()
            .map(|order| {
                let lines = items
                    .iter()
                    .filter(|i| i.order_id == order.id)
                    .cloned()
                    .collect();
                model_to_response(order, lines)
            })
            .collect()
    }

    /// Fetches a single order with its lines.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {order_id} not found")))?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&*self.db_pool)
            .await?;

        model_to_response(order, items)
    }

    /// Returns the active order occupying a table, if any.
    #[instrument(skip(self))]
    pub async fn check_table(&self, table_number: i32) -> Result<Option<OrderResponse>, ServiceError> {
        let found = OrderEntity::find()
            .filter(order::Column::TableNumber.eq(table_number))
            .filter(order::Column::Status.is_not_in(terminal_status_strings()))
            .one(&*self.db_pool)
            .await?;

        match found {
            Some(order) => {
                let items = OrderItemEntity::find()
                    .filter(order_item::Column::OrderId.eq(order.id))
                    .all(&*self.db_pool)
                    .await?;
                Ok(Some(model_to_response(order, items)?))
            }
            None => Ok(None),
        }
    }
}

/// Statuses that take an order off the floor: the table is free and the
/// order no longer appears in the default work queue.
pub fn terminal_status_strings() -> Vec<String> {
    vec![
        OrderStatus::Paid.to_string(),
        OrderStatus::Archived.to_string(),
    ]
}

fn stored_status(order: &OrderModel) -> Result<OrderStatus, ServiceError> {
    order.status.parse::<OrderStatus>().map_err(|_| {
        ServiceError::InternalError(format!(
            "Order {} carries unknown status '{}'",
            order.id, order.status
        ))
    })
}

/// Bumps the daily ticket counter and returns the new ticket number.
/// Must run inside the order-creation transaction.
///
/// The increment is a single atomic UPDATE rather than read-then-write:
/// under READ COMMITTED two concurrent transactions would otherwise read
/// the same value and commit duplicate tickets.
async fn next_ticket_number(txn: &DatabaseTransaction) -> Result<i32, ServiceError> {
    let bumped = CounterEntity::update_many()
        .col_expr(
            CounterColumn::LastTicket,
            Expr::col(CounterColumn::LastTicket).add(1),
        )
        .filter(CounterColumn::Id.eq(COUNTER_ROW_ID))
        .exec(txn)
        .await?;

    if bumped.rows_affected == 0 {
        // Counter row is seeded by migrations; recreate it if missing.
        let active = CounterActiveModel {
            id: Set(COUNTER_ROW_ID),
            last_ticket: Set(1),
        };
        active.insert(txn).await?;
        return Ok(1);
    }

    let row = CounterEntity::find_by_id(COUNTER_ROW_ID)
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError("Ticket counter row vanished mid-transaction".to_string())
        })?;

    Ok(row.last_ticket)
}

pub(crate) fn model_to_response(
    order: OrderModel,
    items: Vec<OrderItemModel>,
) -> Result<OrderResponse, ServiceError> {
    let status = stored_status(&order)?;

    Ok(OrderResponse {
        id: order.id,
        ticket_number: order.ticket_number,
        table_number: order.table_number,
        status,
        subtotal: order.subtotal,
        tax: order.tax,
        total: order.total,
        items: items
            .into_iter()
            .map(|item| OrderLineResponse {
                id: item.id,
                item_id: item.menu_item_id,
                name: item.name,
                unit_price: item.unit_price,
                quantity: item.quantity,
            })
            .collect(),
        created_at: order.created_at,
        updated_at: order.updated_at,
    })
}
