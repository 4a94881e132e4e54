use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    analytics::GeoPoint,
    audit::log_audit,
    coupons::{self, AppliedCoupon, Coupon, CouponContext},
    dto::orders::{
        CartLineInput, OrderWithItems, PlaceOrderRequest, QuoteRequest, TrackOrderResponse,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{CustomerInfo, Order, OrderLine},
    pricing::{self, Bill, CartLine},
    response::{ApiResponse, Meta},
    state::AppState,
    status::{self, Notification, OrderStatus, OrderType},
};

pub async fn quote(state: &AppState, payload: QuoteRequest) -> AppResult<ApiResponse<Bill>> {
    let cart = validate_cart(payload.cart)?;
    let coupon = resolve_coupon(payload.coupon_code.as_deref())?;

    let is_first_order = match payload.phone.as_deref() {
        Some(phone) => {
            let phone = validate_phone(phone)?;
            is_first_order(state, &phone).await?
        }
        None => false,
    };
    let ctx = CouponContext::at(Utc::now(), is_first_order);

    let bill = pricing::compute_bill(&cart, payload.order_type, coupon, &ctx);
    Ok(ApiResponse::success("Quote", bill, Some(Meta::empty())))
}

pub async fn place_order(
    state: &AppState,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let cart = validate_cart(payload.cart)?;
    let phone = validate_phone(&payload.phone)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }

    let address = match payload.order_type {
        OrderType::Delivery => match payload.address.as_deref().map(str::trim) {
            Some(addr) if !addr.is_empty() => addr.to_string(),
            _ => {
                return Err(AppError::BadRequest(
                    "Delivery address is required".into(),
                ));
            }
        },
        OrderType::TakeAway => "Take-away".to_string(),
    };

    let coupon = resolve_coupon(payload.coupon_code.as_deref())?;
    let first_order = is_first_order(state, &phone).await?;
    let ctx = CouponContext::at(Utc::now(), first_order);
    let bill = pricing::compute_bill(&cart, payload.order_type, coupon, &ctx);

    let order_id = Uuid::new_v4();
    let code = build_order_code(order_id);

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(order_id),
        code: Set(code),
        customer_name: Set(payload.name.trim().to_string()),
        customer_phone: Set(phone),
        customer_email: Set(payload.email),
        customer_uid: Set(payload.uid),
        order_type: Set(payload.order_type.as_str().to_string()),
        address: Set(address),
        latitude: Set(payload.location.map(|l| l.latitude)),
        longitude: Set(payload.location.map(|l| l.longitude)),
        item_subtotal: Set(bill.item_subtotal),
        discount: Set(bill.discount),
        delivery_charge: Set(bill.delivery_charge),
        gst_tax: Set(bill.gst_tax),
        total: Set(bill.to_pay),
        coupon_code: Set(bill.applied_coupon.as_ref().map(|c| c.code.clone())),
        coupon_discount: Set(bill.applied_coupon.as_ref().map(|c| c.discount)),
        freebie: Set(bill.applied_coupon.as_ref().and_then(|c| c.freebie.clone())),
        status: Set(OrderStatus::AcceptOrder.as_str().to_string()),
        seen: Set(false),
        notification: Set(Notification::New.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderLine> = Vec::new();
    for line in &cart {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            name: Set(line.name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            gst_percent: Set(line.gst_percent_or_default()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(line_from_entity(item));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_placed",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "code": order.code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn track_order(
    state: &AppState,
    code: &str,
) -> AppResult<ApiResponse<TrackOrderResponse>> {
    let order = find_by_code(state, code).await?;
    let status = parse_status(&order.status)?;
    let order_type = parse_order_type(&order.order_type)?;
    let notification = Notification::from_str(&order.notification).unwrap_or(Notification::None);

    let resp = TrackOrderResponse {
        code: order.code,
        status,
        status_text: status::customer_status_text(status, order.seen, order_type).to_string(),
        notification,
        order_type,
        total: order.total,
        created_at: order.created_at.with_timezone(&Utc),
    };
    Ok(ApiResponse::success("Order", resp, Some(Meta::empty())))
}

/// Ack-based notification clearing: the customer's widget confirms delivery
/// of the push text and the record drops back to `none`.
pub async fn ack_notification(
    state: &AppState,
    code: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let order = find_by_code(state, code).await?;

    let mut active: OrderActive = order.into();
    active.notification = Set(Notification::None.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Notification cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn find_by_code(state: &AppState, code: &str) -> AppResult<OrderModel> {
    let order = Orders::find()
        .filter(OrderCol::Code.eq(code))
        .one(&state.orm)
        .await?;
    match order {
        Some(o) => Ok(o),
        None => Err(AppError::NotFound),
    }
}

/// A phone with no delivered order yet counts as a first-time customer.
pub async fn is_first_order(state: &AppState, phone: &str) -> AppResult<bool> {
    let delivered = Orders::find()
        .filter(OrderCol::CustomerPhone.eq(phone))
        .filter(OrderCol::Status.eq(OrderStatus::Delivered.as_str()))
        .count(&state.orm)
        .await?;
    Ok(delivered == 0)
}

pub async fn load_order_with_items(
    state: &AppState,
    id: Uuid,
) -> AppResult<(OrderModel, Vec<OrderItemModel>)> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(&state.orm)
        .await?;
    Ok((order, items))
}

fn validate_cart(cart: Vec<CartLineInput>) -> AppResult<Vec<CartLine>> {
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    for line in &cart {
        if line.name.trim().is_empty() {
            return Err(AppError::BadRequest("Cart item has no name".into()));
        }
        if line.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        if line.price < rust_decimal::Decimal::ZERO {
            return Err(AppError::BadRequest("Cart has invalid price".into()));
        }
    }
    Ok(cart.into_iter().map(CartLine::from).collect())
}

pub fn validate_phone(phone: &str) -> AppResult<String> {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.len() < 10 || digits.len() > 13 {
        return Err(AppError::BadRequest("Invalid phone number".into()));
    }
    Ok(digits)
}

fn resolve_coupon(code: Option<&str>) -> AppResult<Option<&'static Coupon>> {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => match coupons::find_coupon(code) {
            Some(coupon) => Ok(Some(coupon)),
            None => Err(AppError::BadRequest("Unknown coupon code".into())),
        },
        None => Ok(None),
    }
}

fn build_order_code(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    let short = &suffix[..6];
    format!("OD-{}-{}", date, short.to_uppercase())
}

pub fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    OrderStatus::from_str(raw)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown order status: {raw}")))
}

pub fn parse_order_type(raw: &str) -> AppResult<OrderType> {
    OrderType::from_str(raw)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown order type: {raw}")))
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status = parse_status(&model.status)?;
    let order_type = parse_order_type(&model.order_type)?;
    let notification = Notification::from_str(&model.notification).unwrap_or(Notification::None);

    let location = match (model.latitude, model.longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let coupon = model.coupon_code.map(|code| AppliedCoupon {
        code,
        discount: model.coupon_discount.unwrap_or_default(),
        freebie: model.freebie,
    });

    Ok(Order {
        id: model.id,
        code: model.code,
        customer: CustomerInfo {
            name: model.customer_name,
            phone: model.customer_phone,
            email: model.customer_email,
            uid: model.customer_uid,
        },
        order_type,
        address: model.address,
        location,
        item_subtotal: model.item_subtotal,
        discount: model.discount,
        delivery_charge: model.delivery_charge,
        gst_tax: model.gst_tax,
        total: model.total,
        coupon,
        status,
        seen: model.seen,
        notification,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub fn line_from_entity(model: OrderItemModel) -> OrderLine {
    OrderLine {
        id: model.id,
        name: model.name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        gst_percent: model.gst_percent,
    }
}
