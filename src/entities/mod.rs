pub mod activity_log;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod ticket_counter;
