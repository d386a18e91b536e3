pub mod activity;
pub mod dashboard;
pub mod health;
pub mod menu;
pub mod orders;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::db::DbPool;
use crate::services::{
    activity_log::ActivityLogService, dashboard::DashboardService, menu::MenuService,
    orders::OrderService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub menu: MenuService,
    pub orders: OrderService,
    pub dashboard: DashboardService,
    pub activity: ActivityLogService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, tax_rate: Decimal) -> Self {
        let activity = ActivityLogService::new(db_pool.clone());
        Self {
            menu: MenuService::new(db_pool.clone(), activity.clone()),
            orders: OrderService::new(db_pool.clone(), activity.clone(), tax_rate),
            dashboard: DashboardService::new(db_pool, activity.clone()),
            activity,
        }
    }
}
