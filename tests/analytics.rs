use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use axum_restaurant_api::analytics::{
    DateRange, Granularity, LineFacts, OrderFacts, build_dashboard, fold_customers,
    normalize_item_name,
};
use axum_restaurant_api::status::OrderStatus;

fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).single().expect("valid time")
}

fn order(
    phone: &str,
    status: OrderStatus,
    total: i64,
    created_at: DateTime<Utc>,
) -> OrderFacts {
    OrderFacts {
        phone: phone.to_string(),
        customer_name: format!("Customer {phone}"),
        customer_email: None,
        address: "12 MG Road".to_string(),
        status,
        total: Decimal::from(total),
        created_at,
        lines: Vec::new(),
        location: None,
    }
}

fn with_lines(mut facts: OrderFacts, lines: Vec<(&str, i32, i64)>) -> OrderFacts {
    facts.lines = lines
        .into_iter()
        .map(|(name, quantity, unit_price)| LineFacts {
            name: name.to_string(),
            quantity,
            unit_price: Decimal::from(unit_price),
        })
        .collect();
    facts
}

#[test]
fn variant_labels_normalize_to_one_bucket() {
    assert_eq!(normalize_item_name("Paneer Tikka (Full)"), "Paneer Tikka");
    assert_eq!(normalize_item_name("Paneer Tikka (Half)"), "Paneer Tikka");
    // Already-normalized names pass through untouched.
    assert_eq!(normalize_item_name("Paneer Tikka"), "Paneer Tikka");
    assert_eq!(
        normalize_item_name(&normalize_item_name("Biryani (Half)")),
        "Biryani"
    );
}

#[test]
fn day_boundaries_use_calendar_semantics() {
    let now = at(2026, 3, 10, 9);

    let (start, end) = DateRange::Today.bounds(now);
    assert_eq!(start, Some(at(2026, 3, 10, 0)));
    assert_eq!(end, None);

    let (start, end) = DateRange::Yesterday.bounds(now);
    assert_eq!(start, Some(at(2026, 3, 9, 0)));
    assert_eq!(end, Some(at(2026, 3, 10, 0)));

    // Last 7 days covers today plus the six calendar days before it.
    let (start, _) = DateRange::Last7Days.bounds(now);
    assert_eq!(start, Some(at(2026, 3, 4, 0)));

    let (start, _) = DateRange::ThisMonth.bounds(now);
    assert_eq!(start, Some(at(2026, 3, 1, 0)));

    let (start, _) = DateRange::ThisYear.bounds(now);
    assert_eq!(start, Some(at(2026, 1, 1, 0)));

    assert_eq!(DateRange::AllTime.bounds(now), (None, None));
}

#[test]
fn granularity_is_keyed_to_the_selected_range() {
    assert_eq!(DateRange::Today.granularity(), Granularity::Day);
    assert_eq!(DateRange::Last30Days.granularity(), Granularity::Day);
    assert_eq!(DateRange::ThisYear.granularity(), Granularity::Month);
    assert_eq!(DateRange::AllTime.granularity(), Granularity::Month);
}

// Every in-range phone lands in exactly one bucket, decided solely by
// presence in the historical set.
#[test]
fn segmentation_partitions_customers_by_history() {
    let now = at(2026, 3, 10, 18);
    let orders = vec![
        // Ordered last month and again today: repeat.
        order("9000000001", OrderStatus::Delivered, 500, at(2026, 2, 12, 13)),
        order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 10, 12)),
        // First ever order today: new.
        order("9000000002", OrderStatus::Delivered, 400, at(2026, 3, 10, 14)),
    ];

    let dashboard = build_dashboard(&orders, DateRange::Today, now);
    assert_eq!(dashboard.segments.new_customers, 1);
    assert_eq!(dashboard.segments.repeat_customers, 1);
    assert_eq!(dashboard.segments.new_customer_sales, Decimal::from(400));
    assert_eq!(dashboard.segments.repeat_customer_sales, Decimal::from(300));

    // Under All Time there is no history, so everyone is new.
    let dashboard = build_dashboard(&orders, DateRange::AllTime, now);
    assert_eq!(dashboard.segments.new_customers, 2);
    assert_eq!(dashboard.segments.repeat_customers, 0);
}

#[test]
fn summary_counts_delivered_orders_only() {
    let now = at(2026, 3, 10, 18);
    let orders = vec![
        order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 10, 12)),
        order("9000000002", OrderStatus::Delivered, 500, at(2026, 3, 10, 13)),
        order("9000000003", OrderStatus::AcceptOrder, 900, at(2026, 3, 10, 14)),
        order("9000000004", OrderStatus::Declined, 250, at(2026, 3, 10, 15)),
    ];

    let dashboard = build_dashboard(&orders, DateRange::Today, now);
    assert_eq!(dashboard.summary.sales, Decimal::from(800));
    assert_eq!(dashboard.summary.orders, 2);
    assert_eq!(dashboard.summary.average_order_value, Decimal::from(400));
}

#[test]
fn cancellation_rate_counts_every_status_in_the_denominator() {
    let now = at(2026, 3, 10, 18);
    let orders = vec![
        order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 10, 12)),
        order("9000000002", OrderStatus::Delivered, 500, at(2026, 3, 10, 13)),
        order("9000000003", OrderStatus::OnItsWay, 900, at(2026, 3, 10, 14)),
        order("9000000004", OrderStatus::Declined, 250, at(2026, 3, 10, 15)),
        order("9000000005", OrderStatus::Declined, 150, at(2026, 3, 10, 16)),
    ];

    let dashboard = build_dashboard(&orders, DateRange::Today, now);
    assert_eq!(dashboard.cancellations.declined_orders, 2);
    assert_eq!(dashboard.cancellations.declined_value, Decimal::from(400));
    assert!((dashboard.cancellations.cancellation_rate - 0.4).abs() < f64::EPSILON);

    let empty = build_dashboard(&[], DateRange::Today, now);
    assert_eq!(empty.cancellations.cancellation_rate, 0.0);
}

#[test]
fn cancellation_rate_stays_within_bounds() {
    let now = at(2026, 3, 10, 18);
    let all_declined: Vec<OrderFacts> = (0..4)
        .map(|i| {
            order(
                &format!("900000001{i}"),
                OrderStatus::Declined,
                100,
                at(2026, 3, 10, 10),
            )
        })
        .collect();
    let dashboard = build_dashboard(&all_declined, DateRange::Today, now);
    assert_eq!(dashboard.cancellations.cancellation_rate, 1.0);
}

#[test]
fn time_series_buckets_by_day_or_month() {
    let now = at(2026, 3, 10, 18);
    let orders = vec![
        order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 9, 12)),
        order("9000000002", OrderStatus::Delivered, 500, at(2026, 3, 10, 13)),
        order("9000000003", OrderStatus::Delivered, 200, at(2026, 1, 5, 13)),
    ];

    let weekly = build_dashboard(&orders, DateRange::Last7Days, now);
    let periods: Vec<&str> = weekly.time_series.iter().map(|b| b.period.as_str()).collect();
    assert_eq!(periods, vec!["2026-03-09", "2026-03-10"]);

    let yearly = build_dashboard(&orders, DateRange::ThisYear, now);
    let periods: Vec<&str> = yearly.time_series.iter().map(|b| b.period.as_str()).collect();
    assert_eq!(periods, vec!["2026-01", "2026-03"]);
    let march = yearly
        .time_series
        .iter()
        .find(|b| b.period == "2026-03")
        .expect("march bucket");
    assert_eq!(march.sales, Decimal::from(800));
    assert_eq!(march.orders, 2);
}

#[test]
fn hourly_histogram_surfaces_only_nonzero_hours() {
    let now = at(2026, 3, 10, 23);
    let orders = vec![
        order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 10, 13)),
        order("9000000002", OrderStatus::Delivered, 500, at(2026, 3, 10, 13)),
        order("9000000003", OrderStatus::Delivered, 200, at(2026, 3, 10, 20)),
    ];

    let dashboard = build_dashboard(&orders, DateRange::Today, now);
    assert_eq!(dashboard.sales_by_hour.len(), 2);
    assert_eq!(dashboard.sales_by_hour[0].hour, 13);
    assert_eq!(dashboard.sales_by_hour[0].sales, Decimal::from(800));
    assert_eq!(dashboard.sales_by_hour[1].hour, 20);
}

#[test]
fn item_stats_merge_variants() {
    let now = at(2026, 3, 10, 18);
    let orders = vec![
        with_lines(
            order("9000000001", OrderStatus::Delivered, 500, at(2026, 3, 10, 12)),
            vec![("Biryani (Half)", 2, 180), ("Butter Naan", 4, 45)],
        ),
        with_lines(
            order("9000000002", OrderStatus::Delivered, 320, at(2026, 3, 10, 13)),
            vec![("Biryani (Full)", 1, 320)],
        ),
    ];

    let dashboard = build_dashboard(&orders, DateRange::Today, now);
    let biryani = dashboard
        .items_by_quantity
        .iter()
        .find(|i| i.name == "Biryani")
        .expect("merged bucket");
    assert_eq!(biryani.quantity, 3);
    assert_eq!(biryani.revenue, Decimal::from(2 * 180 + 320));
    assert!(
        !dashboard
            .items_by_quantity
            .iter()
            .any(|i| i.name.contains('('))
    );
    // Revenue ordering puts Biryani above Naan.
    assert_eq!(dashboard.items_by_revenue[0].name, "Biryani");
}

#[test]
fn top_customer_lists_cap_at_ten() {
    let now = at(2026, 3, 10, 18);
    let orders: Vec<OrderFacts> = (0..12)
        .map(|i| {
            order(
                &format!("90000000{i:02}"),
                OrderStatus::Delivered,
                100 + i,
                at(2026, 3, 10, 12),
            )
        })
        .collect();

    let dashboard = build_dashboard(&orders, DateRange::Today, now);
    assert_eq!(dashboard.top_customers_by_spend.len(), 10);
    assert_eq!(dashboard.top_customers_by_orders.len(), 10);
    // Highest spender first.
    assert_eq!(dashboard.top_customers_by_spend[0].spent, Decimal::from(111));
}

#[test]
fn geo_points_require_both_coordinates() {
    use axum_restaurant_api::analytics::GeoPoint;

    let now = at(2026, 3, 10, 18);
    let mut located = order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 10, 12));
    located.location = Some(GeoPoint {
        latitude: 12.9716,
        longitude: 77.5946,
    });
    let unlocated = order("9000000002", OrderStatus::Delivered, 200, at(2026, 3, 10, 13));

    let dashboard = build_dashboard(&[located, unlocated], DateRange::Today, now);
    assert_eq!(dashboard.order_locations.len(), 1);
}

#[test]
fn customers_fold_counts_delivered_totals_only() {
    let orders = vec![
        order("9000000001", OrderStatus::Delivered, 500, at(2026, 2, 12, 13)),
        order("9000000001", OrderStatus::Delivered, 300, at(2026, 3, 10, 12)),
        order("9000000001", OrderStatus::Declined, 900, at(2026, 3, 11, 12)),
        order("9000000002", OrderStatus::AcceptOrder, 400, at(2026, 3, 10, 14)),
    ];

    let customers = fold_customers(&orders);
    assert_eq!(customers.len(), 2);

    let first = customers
        .iter()
        .find(|c| c.phone == "9000000001")
        .expect("customer exists");
    assert_eq!(first.total_orders, 2);
    assert_eq!(first.total_spent, Decimal::from(800));
    assert_eq!(first.last_purchase, Some(at(2026, 3, 10, 12)));

    // No delivered orders yet: present, with zero totals.
    let second = customers
        .iter()
        .find(|c| c.phone == "9000000002")
        .expect("customer exists");
    assert_eq!(second.total_orders, 0);
    assert_eq!(second.total_spent, Decimal::ZERO);
    assert_eq!(second.last_purchase, None);
}
