use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::orders::{OrderWithItems, PlaceOrderRequest, QuoteRequest, TrackOrderResponse},
    error::AppResult,
    pricing::Bill,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/quote", post(quote))
        .route("/{code}", get(track_order))
        .route("/{code}/notification/ack", post(ack_notification))
}

#[utoipa::path(
    post,
    path = "/api/orders/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Bill for the cart", body = ApiResponse<Bill>),
        (status = 400, description = "Invalid cart or coupon"),
    ),
    tag = "Orders"
)]
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<Bill>>> {
    let resp = order_service::quote(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Validation failure"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::place_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/{code}", tag = "Orders")]
pub async fn track_order(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<TrackOrderResponse>>> {
    let resp = order_service::track_order(&state, &code).await?;
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/api/orders/{code}/notification/ack", tag = "Orders")]
pub async fn ack_notification(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::ack_notification(&state, &code).await?;
    Ok(Json(resp))
}
