use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::analytics::GeoPoint;
use crate::coupons::AppliedCoupon;
use crate::status::{Notification, OrderStatus, OrderType};

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Present only for authenticated customers; guests are keyed by phone.
    pub uid: Option<Uuid>,
}

/// One customer purchase. The pricing fields are a point-in-time financial
/// record: `total = item_subtotal - discount + delivery_charge + gst_tax` as
/// computed at placement, never recomputed.
#[derive(Debug, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub code: String,
    pub customer: CustomerInfo,
    pub order_type: OrderType,
    pub address: String,
    pub location: Option<GeoPoint>,
    pub item_subtotal: Decimal,
    pub discount: Decimal,
    pub delivery_charge: Decimal,
    pub gst_tax: Decimal,
    pub total: Decimal,
    pub coupon: Option<AppliedCoupon>,
    pub status: OrderStatus,
    pub seen: bool,
    pub notification: Notification,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub gst_percent: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub purpose: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceOption {
    pub label: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub prices: Vec<PriceOption>,
    pub image_url: Option<String>,
    pub is_veg: bool,
    pub popular: bool,
    pub must_try: bool,
    pub is_new: bool,
    pub gst_percent: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuCategory {
    pub id: Uuid,
    pub title: String,
    pub position: i32,
    pub items: Vec<MenuItem>,
}
