use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Context flags computed once at evaluation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponContext {
    pub is_first_order: bool,
    pub is_lunch_window: bool,
    pub is_weekend: bool,
}

impl CouponContext {
    /// Lunch window is 12:00-15:00, weekend is Saturday/Sunday, both read off
    /// the given wall clock. `is_first_order` must come from the order history
    /// of the customer's phone (zero prior delivered orders), not a constant.
    pub fn at(now: DateTime<Utc>, is_first_order: bool) -> Self {
        let hour = now.hour();
        let weekday = now.weekday();
        Self {
            is_first_order,
            is_lunch_window: (12..15).contains(&hour),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

/// A coupon's monetary rule is a pure function of the subtotal and the
/// context flags. A coupon may instead grant a `freebie` with zero discount.
pub struct Coupon {
    pub code: &'static str,
    pub description: &'static str,
    pub min_order: Option<Decimal>,
    pub freebie: Option<&'static str>,
    pub rule: fn(Decimal, &CouponContext) -> Decimal,
}

/// Coupon snapshot attached to a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: Decimal,
    pub freebie: Option<String>,
}

/// Evaluate a coupon against a subtotal. Returns `None` when the coupon does
/// not apply: subtotal under `min_order`, or a zero discount with no freebie.
pub fn evaluate(coupon: &Coupon, subtotal: Decimal, ctx: &CouponContext) -> Option<AppliedCoupon> {
    if let Some(min_order) = coupon.min_order {
        if subtotal < min_order {
            return None;
        }
    }

    let discount = (coupon.rule)(subtotal, ctx);
    if discount <= Decimal::ZERO && coupon.freebie.is_none() {
        return None;
    }

    Some(AppliedCoupon {
        code: coupon.code.to_string(),
        discount: discount.max(Decimal::ZERO),
        freebie: coupon.freebie.map(str::to_string),
    })
}

pub fn find_coupon(code: &str) -> Option<&'static Coupon> {
    COUPON_BOOK.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

pub fn coupon_book() -> &'static [Coupon] {
    COUPON_BOOK
}

fn percent_of(subtotal: Decimal, percent: i64, cap: i64) -> Decimal {
    let raw = subtotal * Decimal::from(percent) / Decimal::from(100);
    raw.min(Decimal::from(cap))
}

fn welcome_rule(subtotal: Decimal, ctx: &CouponContext) -> Decimal {
    if ctx.is_first_order {
        percent_of(subtotal, 10, 100)
    } else {
        Decimal::ZERO
    }
}

fn lunch_rule(_subtotal: Decimal, ctx: &CouponContext) -> Decimal {
    if ctx.is_lunch_window {
        Decimal::from(50)
    } else {
        Decimal::ZERO
    }
}

fn weekend_rule(subtotal: Decimal, ctx: &CouponContext) -> Decimal {
    if ctx.is_weekend {
        percent_of(subtotal, 20, 150)
    } else {
        Decimal::ZERO
    }
}

fn freebie_rule(_subtotal: Decimal, _ctx: &CouponContext) -> Decimal {
    Decimal::ZERO
}

static COUPON_BOOK: &[Coupon] = &[
    Coupon {
        code: "WELCOME10",
        description: "10% off your first order, up to Rs. 100",
        min_order: Some(Decimal::from_parts(199, 0, 0, false, 0)),
        freebie: None,
        rule: welcome_rule,
    },
    Coupon {
        code: "LUNCH50",
        description: "Flat Rs. 50 off between 12pm and 3pm",
        min_order: Some(Decimal::from_parts(299, 0, 0, false, 0)),
        freebie: None,
        rule: lunch_rule,
    },
    Coupon {
        code: "WKND20",
        description: "20% off on weekends, up to Rs. 150",
        min_order: Some(Decimal::from_parts(249, 0, 0, false, 0)),
        freebie: None,
        rule: weekend_rule,
    },
    Coupon {
        code: "CHAIFREE",
        description: "Free Masala Chai with your meal",
        min_order: Some(Decimal::from_parts(349, 0, 0, false, 0)),
        freebie: Some("Masala Chai"),
        rule: freebie_rule,
    },
];
