use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    analytics::{Dashboard, DateRange},
    dto::customers::CustomerList,
    dto::marketing::{EmailCampaignRequest, EmailPayload},
    dto::orders::{OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::{AnalyticsQuery, OrderListQuery},
    routes::{menu, reservations},
    services::{
        admin_service, analytics_service, customer_service, marketing_service, settings_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders).delete(purge_orders))
        .route("/orders/{id}", get(get_order_admin).delete(decline_order))
        .route("/orders/{id}/seen", patch(mark_seen))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/customers", get(list_customers))
        .route("/analytics", get(dashboard))
        .route("/marketing/email", post(assemble_email))
        .route("/settings/{key}", get(get_setting).put(put_setting))
        .merge(menu::admin_router())
        .merge(reservations::admin_router())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurgeOrdersRequest {
    pub passkey: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("unseen_only" = Option<bool>, Query, description = "Only unacknowledged orders"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with per-line GST breakdown", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/seen",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order acknowledged", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn mark_seen(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::mark_seen(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order declined", body = ApiResponse<Order>),
        (status = 400, description = "Order already final"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn decline_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::decline_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders",
    request_body = PurgeOrdersRequest,
    responses(
        (status = 200, description = "All orders deleted"),
        (status = 403, description = "Forbidden or wrong passkey"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn purge_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PurgeOrdersRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::purge_orders(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/customers",
    responses(
        (status = 200, description = "Derived customer list", body = ApiResponse<CustomerList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    params(
        ("range" = Option<String>, Query, description = "today, yesterday, last_7_days, this_month, last_30_days, this_year, all_time")
    ),
    responses(
        (status = 200, description = "Dashboard for the selected range", body = ApiResponse<Dashboard>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let range = query.range.unwrap_or(DateRange::Today);
    let resp = analytics_service::dashboard(&state, &user, range).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/marketing/email",
    request_body = EmailCampaignRequest,
    responses(
        (status = 200, description = "Assembled email payload", body = ApiResponse<EmailPayload>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn assemble_email(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<EmailCampaignRequest>,
) -> AppResult<Json<ApiResponse<EmailPayload>>> {
    let resp = marketing_service::assemble_email(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Settings key")),
    responses(
        (status = 200, description = "Setting value"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = settings_service::get_setting(&state, &user, &key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Settings key")),
    responses(
        (status = 200, description = "Setting saved"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn put_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = settings_service::put_setting(&state, &user, &key, value).await?;
    Ok(Json(resp))
}
