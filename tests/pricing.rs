use rust_decimal::Decimal;

use axum_restaurant_api::coupons::{self, CouponContext};
use axum_restaurant_api::pricing::{CartLine, compute_bill};
use axum_restaurant_api::status::OrderType;

fn line(name: &str, price: i64, quantity: i32, gst_percent: Option<i64>) -> CartLine {
    CartLine {
        name: name.to_string(),
        quantity,
        unit_price: Decimal::from(price),
        gst_percent: gst_percent.map(Decimal::from),
    }
}

#[test]
fn bill_is_deterministic() {
    let cart = vec![
        line("Biryani (Full)", 320, 1, Some(5)),
        line("Butter Naan", 45, 4, Some(5)),
    ];
    let ctx = CouponContext::default();
    let first = compute_bill(&cart, OrderType::Delivery, None, &ctx);
    let second = compute_bill(&cart, OrderType::Delivery, None, &ctx);
    assert_eq!(first, second);
}

#[test]
fn delivery_fee_applies_below_threshold() {
    let cart = vec![line("Dal Makhani", 398, 1, Some(5))];
    let bill = compute_bill(&cart, OrderType::Delivery, None, &CouponContext::default());
    assert_eq!(bill.delivery_charge, Decimal::from(20));

    let cart = vec![line("Dal Makhani", 399, 1, Some(5))];
    let bill = compute_bill(&cart, OrderType::Delivery, None, &CouponContext::default());
    assert_eq!(bill.delivery_charge, Decimal::ZERO);
}

#[test]
fn take_away_never_pays_delivery_fee() {
    let cart = vec![line("Masala Chai", 30, 1, Some(5))];
    let bill = compute_bill(&cart, OrderType::TakeAway, None, &CouponContext::default());
    assert_eq!(bill.delivery_charge, Decimal::ZERO);
}

// Cart of two Biryani at 200 with 5% GST: subtotal 400 clears the free
// delivery threshold, per-line GST adds 20.
#[test]
fn delivery_order_at_threshold() {
    let cart = vec![line("Biryani", 200, 2, Some(5))];
    let bill = compute_bill(&cart, OrderType::Delivery, None, &CouponContext::default());
    assert_eq!(bill.item_subtotal, Decimal::from(400));
    assert_eq!(bill.delivery_charge, Decimal::ZERO);
    assert_eq!(bill.gst_tax, Decimal::from(20));
    assert_eq!(bill.to_pay, Decimal::from(420));
    assert_eq!(bill.display_total, 420);
}

// Same cart with quantity one drops below the threshold and picks up the fee.
#[test]
fn delivery_order_below_threshold() {
    let cart = vec![line("Biryani", 200, 1, Some(5))];
    let bill = compute_bill(&cart, OrderType::Delivery, None, &CouponContext::default());
    assert_eq!(bill.item_subtotal, Decimal::from(200));
    assert_eq!(bill.delivery_charge, Decimal::from(20));
    assert_eq!(bill.gst_tax, Decimal::from(10));
    assert_eq!(bill.to_pay, Decimal::from(230));
    assert_eq!(bill.display_total, 230);
}

#[test]
fn gst_defaults_to_five_percent() {
    let with_default = vec![line("Biryani", 200, 2, None)];
    let explicit = vec![line("Biryani", 200, 2, Some(5))];
    let ctx = CouponContext::default();
    assert_eq!(
        compute_bill(&with_default, OrderType::TakeAway, None, &ctx).gst_tax,
        compute_bill(&explicit, OrderType::TakeAway, None, &ctx).gst_tax,
    );
}

#[test]
fn gst_is_per_line_and_ignores_discount_and_fee() {
    // 12% GST line plus 5% GST line, below the delivery threshold.
    let cart = vec![
        line("Imported Cola", 100, 1, Some(12)),
        line("Butter Naan", 45, 2, Some(5)),
    ];
    let bill = compute_bill(&cart, OrderType::Delivery, None, &CouponContext::default());
    // 100 * 12% + 90 * 5% = 12 + 4.5
    assert_eq!(bill.gst_tax, Decimal::new(165, 1));
    assert_eq!(bill.delivery_charge, Decimal::from(20));
}

#[test]
fn display_total_rounds_half_away_from_zero() {
    let cart = vec![line("Dal Makhani", 210, 1, Some(5))];
    let bill = compute_bill(&cart, OrderType::TakeAway, None, &CouponContext::default());
    assert_eq!(bill.to_pay, Decimal::new(2205, 1));
    assert_eq!(bill.display_total, 221);
}

#[test]
fn coupon_below_min_order_is_rejected() {
    let coupon = coupons::find_coupon("WELCOME10").expect("coupon exists");
    let cart = vec![line("Masala Chai", 30, 2, Some(5))];
    let ctx = CouponContext {
        is_first_order: true,
        ..CouponContext::default()
    };
    let bill = compute_bill(&cart, OrderType::TakeAway, Some(coupon), &ctx);
    assert!(bill.applied_coupon.is_none());
    assert_eq!(bill.discount, Decimal::ZERO);
}

#[test]
fn zero_discount_without_freebie_is_not_attached() {
    let coupon = coupons::find_coupon("WELCOME10").expect("coupon exists");
    let cart = vec![line("Biryani", 320, 1, Some(5))];
    let ctx = CouponContext {
        is_first_order: false,
        ..CouponContext::default()
    };
    let bill = compute_bill(&cart, OrderType::TakeAway, Some(coupon), &ctx);
    assert!(bill.applied_coupon.is_none());
    assert_eq!(bill.discount, Decimal::ZERO);
}

#[test]
fn first_order_coupon_discounts_with_cap() {
    let coupon = coupons::find_coupon("WELCOME10").expect("coupon exists");
    let ctx = CouponContext {
        is_first_order: true,
        ..CouponContext::default()
    };

    let cart = vec![line("Biryani", 320, 1, Some(5))];
    let bill = compute_bill(&cart, OrderType::TakeAway, Some(coupon), &ctx);
    assert_eq!(bill.discount, Decimal::from(32));
    // subtotal - discount + gst: 320 - 32 + 16
    assert_eq!(bill.to_pay, Decimal::from(304));

    // 10% of 1500 would be 150; the cap holds it at 100.
    let cart = vec![line("Biryani", 300, 5, Some(5))];
    let bill = compute_bill(&cart, OrderType::TakeAway, Some(coupon), &ctx);
    assert_eq!(bill.discount, Decimal::from(100));
}

#[test]
fn freebie_coupon_attaches_with_zero_discount() {
    let coupon = coupons::find_coupon("CHAIFREE").expect("coupon exists");
    let cart = vec![line("Biryani", 350, 1, Some(5))];
    let bill = compute_bill(
        &cart,
        OrderType::TakeAway,
        Some(coupon),
        &CouponContext::default(),
    );
    let applied = bill.applied_coupon.expect("coupon applied");
    assert_eq!(applied.discount, Decimal::ZERO);
    assert_eq!(applied.freebie.as_deref(), Some("Masala Chai"));
    assert_eq!(bill.discount, Decimal::ZERO);
}

#[test]
fn coupon_lookup_is_case_insensitive() {
    assert!(coupons::find_coupon("welcome10").is_some());
    assert!(coupons::find_coupon("NOSUCHCODE").is_none());
}
