use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::status::OrderStatus;

/// Dashboard date-range filter. Day boundaries use calendar semantics, not
/// elapsed-hours: "Today" starts at midnight, "Last 7 Days" covers today and
/// the six calendar days before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    Yesterday,
    Last7Days,
    ThisMonth,
    Last30Days,
    ThisYear,
    AllTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

impl DateRange {
    /// Half-open `[start, end)` bounds; `None` means unbounded on that side.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let today = now.date_naive();
        let midnight = |d: chrono::NaiveDate| d.and_time(NaiveTime::MIN).and_utc();
        match self {
            DateRange::Today => (Some(midnight(today)), None),
            DateRange::Yesterday => {
                let start = midnight(today) - chrono::Duration::days(1);
                (Some(start), Some(midnight(today)))
            }
            DateRange::Last7Days => {
                (Some(midnight(today) - chrono::Duration::days(6)), None)
            }
            DateRange::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                (Some(midnight(first)), None)
            }
            DateRange::Last30Days => {
                (Some(midnight(today) - chrono::Duration::days(29)), None)
            }
            DateRange::ThisYear => {
                let first = chrono::NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                (Some(midnight(first)), None)
            }
            DateRange::AllTime => (None, None),
        }
    }

    /// Bucket granularity is keyed to the selected range, not the span.
    pub fn granularity(&self) -> Granularity {
        match self {
            DateRange::ThisYear | DateRange::AllTime => Granularity::Month,
            _ => Granularity::Day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// The order fields the aggregation pass reads. Built once per recompute from
/// the persisted orders and their line items.
#[derive(Debug, Clone)]
pub struct OrderFacts {
    pub phone: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub address: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<LineFacts>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone)]
pub struct LineFacts {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RangeSummary {
    pub sales: Decimal,
    pub orders: i64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SegmentBreakdown {
    pub new_customers: i64,
    pub new_customer_sales: Decimal,
    pub repeat_customers: i64,
    pub repeat_customer_sales: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CancellationStats {
    pub declined_orders: i64,
    pub declined_value: Decimal,
    /// `declined / all orders in range`, every status in the denominator.
    pub cancellation_rate: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimeBucket {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for monthly ones.
    pub period: String,
    pub sales: Decimal,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HourBucket {
    pub hour: u32,
    pub sales: Decimal,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemStat {
    pub name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerStat {
    pub name: String,
    pub phone: String,
    pub orders: i64,
    pub spent: Decimal,
}

/// Customer list row, derived by folding every order sharing a phone number.
/// Never stored; recomputed on each read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub total_orders: i64,
    pub total_spent: Decimal,
    pub last_purchase: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    pub range: DateRange,
    pub summary: RangeSummary,
    pub segments: SegmentBreakdown,
    pub cancellations: CancellationStats,
    pub time_series: Vec<TimeBucket>,
    pub sales_by_hour: Vec<HourBucket>,
    pub items_by_quantity: Vec<ItemStat>,
    pub items_by_revenue: Vec<ItemStat>,
    pub top_customers_by_spend: Vec<CustomerStat>,
    pub top_customers_by_orders: Vec<CustomerStat>,
    pub order_locations: Vec<GeoPoint>,
}

/// Strip a trailing parenthetical variant label so "Biryani (Half)" and
/// "Biryani (Full)" aggregate into one "Biryani" bucket. Idempotent.
pub fn normalize_item_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.rfind('(') {
            return trimmed[..open].trim_end().to_string();
        }
    }
    trimmed.to_string()
}

fn in_bounds(
    t: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    if let Some(start) = start {
        if t < start {
            return false;
        }
    }
    if let Some(end) = end {
        if t >= end {
            return false;
        }
    }
    true
}

/// Recompute the full dashboard for one range selection.
///
/// A phone counts as a repeat customer iff it appears in the historical set
/// (orders before the range start); the same customer can therefore be "new"
/// for one range and "repeat" for another. That is relative-to-filter by
/// design, not a lifetime flag.
pub fn build_dashboard(orders: &[OrderFacts], range: DateRange, now: DateTime<Utc>) -> Dashboard {
    let (start, end) = range.bounds(now);

    let in_range: Vec<&OrderFacts> = orders
        .iter()
        .filter(|o| in_bounds(o.created_at, start, end))
        .collect();
    let historical_phones: HashSet<&str> = orders
        .iter()
        .filter(|o| match start {
            Some(start) => o.created_at < start,
            None => false,
        })
        .map(|o| o.phone.as_str())
        .collect();

    let delivered: Vec<&&OrderFacts> = in_range
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .collect();

    let sales: Decimal = delivered.iter().map(|o| o.total).sum();
    let order_count = delivered.len() as i64;
    let average_order_value = if order_count > 0 {
        (sales / Decimal::from(order_count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    // Per-phone bucket: fixed for all of that phone's in-range orders.
    let mut new_phones: HashSet<&str> = HashSet::new();
    let mut repeat_phones: HashSet<&str> = HashSet::new();
    let mut new_customer_sales = Decimal::ZERO;
    let mut repeat_customer_sales = Decimal::ZERO;
    for order in &delivered {
        if historical_phones.contains(order.phone.as_str()) {
            repeat_phones.insert(order.phone.as_str());
            repeat_customer_sales += order.total;
        } else {
            new_phones.insert(order.phone.as_str());
            new_customer_sales += order.total;
        }
    }

    let declined: Vec<&&OrderFacts> = in_range
        .iter()
        .filter(|o| o.status == OrderStatus::Declined)
        .collect();
    let declined_value: Decimal = declined.iter().map(|o| o.total).sum();
    let cancellation_rate = if in_range.is_empty() {
        0.0
    } else {
        declined.len() as f64 / in_range.len() as f64
    };

    let mut series: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    for order in &delivered {
        let period = match range.granularity() {
            Granularity::Day => order.created_at.format("%Y-%m-%d").to_string(),
            Granularity::Month => order.created_at.format("%Y-%m").to_string(),
        };
        let entry = series.entry(period).or_insert((Decimal::ZERO, 0));
        entry.0 += order.total;
        entry.1 += 1;
    }
    let time_series = series
        .into_iter()
        .map(|(period, (sales, orders))| TimeBucket { period, sales, orders })
        .collect();

    let mut hours: BTreeMap<u32, (Decimal, i64)> = BTreeMap::new();
    for order in &delivered {
        let entry = hours.entry(order.created_at.hour()).or_insert((Decimal::ZERO, 0));
        entry.0 += order.total;
        entry.1 += 1;
    }
    let sales_by_hour = hours
        .into_iter()
        .map(|(hour, (sales, orders))| HourBucket { hour, sales, orders })
        .collect();

    let mut items: HashMap<String, (i64, Decimal)> = HashMap::new();
    for order in &delivered {
        for line in &order.lines {
            let entry = items
                .entry(normalize_item_name(&line.name))
                .or_insert((0, Decimal::ZERO));
            entry.0 += line.quantity as i64;
            entry.1 += line.unit_price * Decimal::from(line.quantity);
        }
    }
    let mut items_by_quantity: Vec<ItemStat> = items
        .into_iter()
        .map(|(name, (quantity, revenue))| ItemStat { name, quantity, revenue })
        .collect();
    let mut items_by_revenue = items_by_quantity.clone();
    items_by_quantity.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    items_by_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.name.cmp(&b.name)));

    let mut per_customer: HashMap<&str, CustomerStat> = HashMap::new();
    for order in &delivered {
        let entry = per_customer
            .entry(order.phone.as_str())
            .or_insert_with(|| CustomerStat {
                name: order.customer_name.clone(),
                phone: order.phone.clone(),
                orders: 0,
                spent: Decimal::ZERO,
            });
        entry.orders += 1;
        entry.spent += order.total;
    }
    let customers: Vec<CustomerStat> = per_customer.into_values().collect();
    let mut top_customers_by_spend = customers.clone();
    top_customers_by_spend.sort_by(|a, b| b.spent.cmp(&a.spent).then(a.phone.cmp(&b.phone)));
    top_customers_by_spend.truncate(10);
    let mut top_customers_by_orders = customers;
    top_customers_by_orders.sort_by(|a, b| b.orders.cmp(&a.orders).then(a.phone.cmp(&b.phone)));
    top_customers_by_orders.truncate(10);

    let order_locations = delivered.iter().filter_map(|o| o.location).collect();

    Dashboard {
        range,
        summary: RangeSummary {
            sales,
            orders: order_count,
            average_order_value,
        },
        segments: SegmentBreakdown {
            new_customers: new_phones.len() as i64,
            new_customer_sales,
            repeat_customers: repeat_phones.len() as i64,
            repeat_customer_sales,
        },
        cancellations: CancellationStats {
            declined_orders: declined.len() as i64,
            declined_value,
            cancellation_rate,
        },
        time_series,
        sales_by_hour,
        items_by_quantity,
        items_by_revenue,
        top_customers_by_spend,
        top_customers_by_orders,
        order_locations,
    }
}

/// Fold all orders into per-phone customer rows. Identity details come from
/// the most recent order; totals count delivered orders only.
pub fn fold_customers(orders: &[OrderFacts]) -> Vec<CustomerSummary> {
    let mut latest: HashMap<&str, &OrderFacts> = HashMap::new();
    for order in orders {
        latest
            .entry(order.phone.as_str())
            .and_modify(|current| {
                if order.created_at > current.created_at {
                    *current = order;
                }
            })
            .or_insert(order);
    }

    let mut customers: Vec<CustomerSummary> = latest
        .into_iter()
        .map(|(phone, newest)| {
            let mut total_orders = 0;
            let mut total_spent = Decimal::ZERO;
            let mut last_purchase = None;
            for order in orders
                .iter()
                .filter(|o| o.phone == phone && o.status == OrderStatus::Delivered)
            {
                total_orders += 1;
                total_spent += order.total;
                if last_purchase.map_or(true, |t| order.created_at > t) {
                    last_purchase = Some(order.created_at);
                }
            }
            CustomerSummary {
                name: newest.customer_name.clone(),
                phone: phone.to_string(),
                address: newest.address.clone(),
                total_orders,
                total_spent,
                last_purchase,
            }
        })
        .collect();

    customers.sort_by(|a, b| b.total_spent.cmp(&a.total_spent).then(a.phone.cmp(&b.phone)));
    customers
}
