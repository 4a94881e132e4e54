use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{OrderList, OrderWithItems},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::admin::{PurgeOrdersRequest, UpdateOrderStatusRequest},
    routes::params::{OrderListQuery, SortOrder},
    services::order_service::{line_from_entity, load_order_with_items, order_from_entity, parse_status},
    state::AppState,
    status::{self, OrderStatus},
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        parse_status(status).map_err(|_| AppError::BadRequest("Invalid status filter".into()))?;
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }
    if query.unseen_only.unwrap_or(false) {
        condition = condition.add(OrderCol::Seen.eq(false));
    }

    let mut finder = Orders::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let (order, items) = load_order_with_items(state, id).await?;

    let data = OrderWithItems {
        order: order_from_entity(order)?,
        items: items.into_iter().map(line_from_entity).collect(),
    };
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

/// Staff acknowledgment. While the order is still in `Accept Order` the
/// customer widget flips from "Awaiting Confirmation" to "Preparing Your
/// food", so the paired notification is `preparing`.
pub async fn mark_seen(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current = parse_status(&existing.status)?;
    let mut active: OrderActive = existing.into();
    active.seen = Set(true);
    if current == OrderStatus::AcceptOrder {
        active.notification = Set(status::Notification::Preparing.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Order acknowledged",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let target = parse_status(&payload.status)
        .map_err(|_| AppError::BadRequest("Invalid order status".into()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current = parse_status(&existing.status)?;
    if !current.can_transition(target) {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {} to {}",
            current.as_str(),
            target.as_str()
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(target.as_str().to_string());
    active.notification = Set(status::notification_for(target).as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Decline is the terminal branch of the lifecycle, kept as an explicit
/// status value so customer-facing views can render it.
pub async fn decline_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    update_order_status(
        state,
        user,
        id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Declined.as_str().to_string(),
        },
    )
    .await
}

/// Wipe the whole order book. Gated by a passkey verified server-side
/// against configuration; line items go with their orders in one
/// transaction.
pub async fn purge_orders(
    state: &AppState,
    user: &AuthUser,
    payload: PurgeOrdersRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if payload.passkey != state.config.purge_passkey {
        return Err(AppError::Forbidden);
    }

    let txn = state.orm.begin().await?;
    let result = Orders::delete_many().exec(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "orders_purged",
        Some("orders"),
        Some(serde_json::json!({ "deleted": result.rows_affected })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.analytics.write().await.clear();

    Ok(ApiResponse::success(
        "Orders deleted",
        serde_json::json!({ "deleted": result.rows_affected }),
        Some(Meta::empty()),
    ))
}
