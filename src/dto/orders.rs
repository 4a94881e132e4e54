use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::analytics::GeoPoint;
use crate::models::{Order, OrderLine};
use crate::pricing::CartLine;
use crate::status::{Notification, OrderStatus, OrderType};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartLineInput {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub gst_percent: Option<Decimal>,
}

impl From<CartLineInput> for CartLine {
    fn from(input: CartLineInput) -> Self {
        CartLine {
            name: input.name,
            quantity: input.quantity,
            unit_price: input.price,
            gst_percent: input.gst_percent,
        }
    }
}

/// Run the pricing calculator without placing an order. The phone, when
/// given, drives genuine first-order detection for coupon context.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub order_type: OrderType,
    pub cart: Vec<CartLineInput>,
    pub coupon_code: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub uid: Option<Uuid>,
    pub order_type: OrderType,
    /// Required for delivery orders; ignored for take-away, which stores the
    /// `"Take-away"` sentinel.
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub cart: Vec<CartLineInput>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// Customer tracking view: the derived status line plus the raw pieces the
/// live widget needs.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackOrderResponse {
    pub code: String,
    pub status: OrderStatus,
    pub status_text: String,
    pub notification: Notification,
    pub order_type: OrderType,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponDto {
    pub code: String,
    pub description: String,
    pub min_order: Option<Decimal>,
    pub freebie: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponList {
    pub items: Vec<CouponDto>,
}
