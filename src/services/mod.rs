// Core services
pub mod activity_log;
pub mod dashboard;
pub mod menu;
pub mod orders;

// Status state machine shared by services and handlers
pub mod order_status;
