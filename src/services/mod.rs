pub mod admin_service;
pub mod analytics_service;
pub mod auth_service;
pub mod customer_service;
pub mod marketing_service;
pub mod menu_service;
pub mod order_service;
pub mod reservation_service;
pub mod settings_service;
