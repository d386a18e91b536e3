use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Single-row table backing the daily ticket sequence. The row is bumped
/// inside the order-creation transaction and zeroed by the end-of-day
/// archive, so ticket numbers restart at 1 each business day.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ticket_counter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub last_ticket: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Id of the singleton counter row.
pub const COUNTER_ROW_ID: i32 = 1;
