//! Seeds the database with a starter menu for demos and local development.
//!
//! Run with `cargo run --bin seed`. Idempotent: does nothing if the menu
//! already has items.

use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use tracing::info;
use uuid::Uuid;

use mesa_pos as api;

use api::entities::menu_item::{ActiveModel as MenuActiveModel, Entity as MenuEntity};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db = api::db::establish_connection_from_app_config(&cfg).await?;
    api::db::run_migrations(&db).await?;

    let existing = MenuEntity::find().count(&db).await?;
    if existing > 0 {
        info!(count = existing, "Menu already seeded, nothing to do");
        return Ok(());
    }

    let starter_menu = [
        ("Classic Burger", dec!(12.50), "Mains"),
        ("Cheese Burger", dec!(11.50), "Mains"),
        ("Pepperoni Pizza", dec!(13.90), "Mains"),
        ("Veggie Pizza", dec!(12.00), "Mains"),
        ("Caesar Salad", dec!(9.75), "Starters"),
        ("Coke", dec!(3.00), "Drinks"),
    ];

    for (name, price, category) in starter_menu {
        let item = MenuActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            price: Set(price),
            category: Set(category.to_string()),
            image_url: Set(None),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(None),
        };
        let model = item.insert(&db).await?;
        info!(name = %model.name, price = %model.price, "Seeded menu item");
    }

    info!("Seeding complete");
    Ok(())
}
