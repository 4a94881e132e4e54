use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle. Forward transitions are staff-driven and one-way;
/// `Declined` is terminal and reachable from any pre-Delivered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[serde(rename = "Accept Order")]
    AcceptOrder,
    #[serde(rename = "On its way")]
    OnItsWay,
    Delivered,
    Declined,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AcceptOrder => "Accept Order",
            OrderStatus::OnItsWay => "On its way",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Declined => "Declined",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Accept Order" => Some(OrderStatus::AcceptOrder),
            "On its way" => Some(OrderStatus::OnItsWay),
            "Delivered" => Some(OrderStatus::Delivered),
            "Declined" => Some(OrderStatus::Declined),
            _ => None,
        }
    }

    /// The next forward state, if any. `Delivered` and `Declined` are final.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::AcceptOrder => Some(OrderStatus::OnItsWay),
            OrderStatus::OnItsWay => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Declined => None,
        }
    }

    pub fn can_transition(&self, to: OrderStatus) -> bool {
        match to {
            OrderStatus::Declined => !matches!(
                self,
                OrderStatus::Delivered | OrderStatus::Declined
            ),
            _ => self.next() == Some(to),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Declined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderType {
    Delivery,
    #[serde(rename = "Take-away")]
    TakeAway,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "Delivery",
            OrderType::TakeAway => "Take-away",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Delivery" => Some(OrderType::Delivery),
            "Take-away" => Some(OrderType::TakeAway),
            _ => None,
        }
    }
}

/// Customer-facing push state. Distinct from `OrderStatus` so the client can
/// acknowledge a one-shot notification without touching the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Notification {
    New,
    Preparing,
    #[serde(rename = "on a way")]
    OnAWay,
    Delivered,
    Declined,
    None,
}

impl Notification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notification::New => "new",
            Notification::Preparing => "preparing",
            Notification::OnAWay => "on a way",
            Notification::Delivered => "delivered",
            Notification::Declined => "declined",
            Notification::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Notification::New),
            "preparing" => Some(Notification::Preparing),
            "on a way" => Some(Notification::OnAWay),
            "delivered" => Some(Notification::Delivered),
            "declined" => Some(Notification::Declined),
            "none" => Some(Notification::None),
            _ => None,
        }
    }
}

/// Notification paired with a forward transition into `to`.
pub fn notification_for(to: OrderStatus) -> Notification {
    match to {
        OrderStatus::AcceptOrder => Notification::New,
        OrderStatus::OnItsWay => Notification::OnAWay,
        OrderStatus::Delivered => Notification::Delivered,
        OrderStatus::Declined => Notification::Declined,
    }
}

/// Customer-visible status line, derived from `(status, seen, order_type)`.
/// Take-away conflates delivered with ready-for-pickup on purpose.
pub fn customer_status_text(status: OrderStatus, seen: bool, order_type: OrderType) -> &'static str {
    match (status, order_type) {
        (OrderStatus::AcceptOrder, _) => {
            if seen {
                "Preparing Your food"
            } else {
                "Awaiting Confirmation"
            }
        }
        (OrderStatus::OnItsWay, OrderType::Delivery) => "Your order is out for delivery",
        (OrderStatus::OnItsWay, OrderType::TakeAway) => "Ready for Pickup",
        (OrderStatus::Delivered, OrderType::Delivery) => "Delivered",
        (OrderStatus::Delivered, OrderType::TakeAway) => "Ready for Pickup",
        (OrderStatus::Declined, _) => "Order was Declined",
    }
}
