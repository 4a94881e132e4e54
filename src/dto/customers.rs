use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDto {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub total_orders: i64,
    pub total_spent: Decimal,
    pub last_purchase: Option<DateTime<Utc>>,
    /// Deep links the dashboard opens; nothing this service calls itself.
    pub chat_link: String,
    pub maps_link: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<CustomerDto>,
}
