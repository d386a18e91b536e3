use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::activity_log::{
        ActiveModel as LogActiveModel, Entity as LogEntity, Model as LogModel,
    },
    errors::ServiceError,
};

/// Number of entries served by the history endpoint.
const HISTORY_LIMIT: u64 = 100;

/// Append-only activity sink. Writes are fire-and-forget: a failed log
/// write must never fail the operation that produced it.
#[derive(Clone)]
pub struct ActivityLogService {
    db_pool: Arc<DbPool>,
}

impl ActivityLogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records one activity entry. Failures are logged locally and swallowed.
    #[instrument(skip(self, details))]
    pub async fn record(&self, action: &str, details: impl Into<String>, actor: &str) {
        let entry = LogActiveModel {
            id: Set(Uuid::new_v4()),
            action: Set(action.to_string()),
            details: Set(details.into()),
            actor: Set(actor.to_string()),
            created_at: Set(Utc::now()),
        };

        if let Err(e) = entry.insert(&*self.db_pool).await {
            warn!(error = %e, action = action, "Failed to write activity log entry");
        }
    }

    /// Returns the most recent activity entries, newest first.
    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<LogModel>, ServiceError> {
        let entries = LogEntity::find()
            .order_by_desc(crate::entities::activity_log::Column::CreatedAt)
            .limit(HISTORY_LIMIT)
            .all(&*self.db_pool)
            .await?;

        Ok(entries)
    }
}
