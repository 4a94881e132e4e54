use axum_restaurant_api::status::{
    Notification, OrderStatus, OrderType, customer_status_text, notification_for,
};

const ALL_STATUSES: [OrderStatus; 4] = [
    OrderStatus::AcceptOrder,
    OrderStatus::OnItsWay,
    OrderStatus::Delivered,
    OrderStatus::Declined,
];

#[test]
fn lifecycle_is_linear_and_one_way() {
    assert!(OrderStatus::AcceptOrder.can_transition(OrderStatus::OnItsWay));
    assert!(OrderStatus::OnItsWay.can_transition(OrderStatus::Delivered));

    // No skipping forward, no moving backwards.
    assert!(!OrderStatus::AcceptOrder.can_transition(OrderStatus::Delivered));
    assert!(!OrderStatus::OnItsWay.can_transition(OrderStatus::AcceptOrder));
    assert!(!OrderStatus::Delivered.can_transition(OrderStatus::OnItsWay));
}

#[test]
fn decline_reachable_from_any_pre_delivered_state() {
    assert!(OrderStatus::AcceptOrder.can_transition(OrderStatus::Declined));
    assert!(OrderStatus::OnItsWay.can_transition(OrderStatus::Declined));
    assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Declined));
    assert!(!OrderStatus::Declined.can_transition(OrderStatus::Declined));
}

#[test]
fn final_states_have_no_exit() {
    for target in ALL_STATUSES {
        assert!(!OrderStatus::Delivered.can_transition(target));
        assert!(!OrderStatus::Declined.can_transition(target));
    }
    assert!(OrderStatus::Delivered.is_final());
    assert!(OrderStatus::Declined.is_final());
    assert_eq!(OrderStatus::Delivered.next(), None);
    assert_eq!(OrderStatus::Declined.next(), None);
}

#[test]
fn transitions_pair_with_notifications() {
    assert_eq!(notification_for(OrderStatus::AcceptOrder), Notification::New);
    assert_eq!(notification_for(OrderStatus::OnItsWay), Notification::OnAWay);
    assert_eq!(
        notification_for(OrderStatus::Delivered),
        Notification::Delivered
    );
    assert_eq!(
        notification_for(OrderStatus::Declined),
        Notification::Declined
    );
}

#[test]
fn status_strings_round_trip() {
    for status in ALL_STATUSES {
        assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
    }
    assert_eq!(OrderStatus::from_str("Shipped"), None);

    for notification in [
        Notification::New,
        Notification::Preparing,
        Notification::OnAWay,
        Notification::Delivered,
        Notification::Declined,
        Notification::None,
    ] {
        assert_eq!(
            Notification::from_str(notification.as_str()),
            Some(notification)
        );
    }
}

// A fresh order reads "Awaiting Confirmation"; the same order reads
// "Preparing Your food" once staff has acknowledged it.
#[test]
fn acknowledgment_changes_customer_text() {
    assert_eq!(
        customer_status_text(OrderStatus::AcceptOrder, false, OrderType::Delivery),
        "Awaiting Confirmation"
    );
    assert_eq!(
        customer_status_text(OrderStatus::AcceptOrder, true, OrderType::Delivery),
        "Preparing Your food"
    );
}

#[test]
fn customer_text_depends_on_order_type() {
    assert_eq!(
        customer_status_text(OrderStatus::OnItsWay, true, OrderType::Delivery),
        "Your order is out for delivery"
    );
    assert_eq!(
        customer_status_text(OrderStatus::OnItsWay, true, OrderType::TakeAway),
        "Ready for Pickup"
    );
    assert_eq!(
        customer_status_text(OrderStatus::Delivered, true, OrderType::Delivery),
        "Delivered"
    );
    // Take-away conflates delivered with ready-for-pickup.
    assert_eq!(
        customer_status_text(OrderStatus::Delivered, true, OrderType::TakeAway),
        "Ready for Pickup"
    );
    assert_eq!(
        customer_status_text(OrderStatus::Declined, false, OrderType::Delivery),
        "Order was Declined"
    );
}
