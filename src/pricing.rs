use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::coupons::{self, AppliedCoupon, Coupon, CouponContext};
use crate::status::OrderType;

/// Delivery orders under this subtotal pay the delivery fee. Fixed policy.
pub const FREE_DELIVERY_THRESHOLD: i64 = 399;
pub const DELIVERY_FEE: i64 = 20;
pub const DEFAULT_GST_PERCENT: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Per-item GST percentage; defaults to 5 when the menu item carries none.
    pub gst_percent: Option<Decimal>,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn gst_percent_or_default(&self) -> Decimal {
        self.gst_percent
            .unwrap_or_else(|| Decimal::from(DEFAULT_GST_PERCENT))
    }
}

/// Full bill breakdown. `to_pay` is the exact decimal persisted with the
/// order; `display_total` is rounded to the nearest rupee for the customer.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Bill {
    pub item_subtotal: Decimal,
    pub discount: Decimal,
    pub delivery_charge: Decimal,
    pub gst_tax: Decimal,
    pub to_pay: Decimal,
    pub display_total: i64,
    pub applied_coupon: Option<AppliedCoupon>,
}

/// Compute a bill for a cart. Deterministic given the same cart, coupon and
/// context; no side effects.
///
/// GST is per line item: `unit_price * quantity * gst_percent / 100`, summed
/// over the cart, independent of discount and delivery charge. The delivery
/// fee applies only to delivery orders below the free-delivery threshold.
pub fn compute_bill(
    cart: &[CartLine],
    order_type: OrderType,
    coupon: Option<&Coupon>,
    ctx: &CouponContext,
) -> Bill {
    let item_subtotal: Decimal = cart.iter().map(CartLine::line_total).sum();

    let applied_coupon = coupon.and_then(|c| coupons::evaluate(c, item_subtotal, ctx));
    let discount = applied_coupon
        .as_ref()
        .map(|a| a.discount)
        .unwrap_or(Decimal::ZERO);

    let delivery_charge = match order_type {
        OrderType::Delivery if item_subtotal < Decimal::from(FREE_DELIVERY_THRESHOLD) => {
            Decimal::from(DELIVERY_FEE)
        }
        _ => Decimal::ZERO,
    };

    let gst_tax: Decimal = cart
        .iter()
        .map(|line| line.line_total() * line.gst_percent_or_default() / Decimal::from(100))
        .sum();

    let to_pay = item_subtotal - discount + delivery_charge + gst_tax;
    let display_total = to_pay
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);

    Bill {
        item_subtotal,
        discount,
        delivery_charge,
        gst_tax,
        to_pay,
        display_total,
        applied_coupon,
    }
}
