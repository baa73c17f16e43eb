// Services module - business logic layer

pub mod food_service;
pub mod order_service;

pub use food_service::FoodService;
pub use order_service::OrderService;
