use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Reservation,
    response::ApiResponse,
    routes::params::ReservationListQuery,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_reservation))
}

/// Admin-only reservation endpoints, mounted under `/api/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list_reservations))
        .route("/reservations/{id}", patch(update_reservation))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created", body = ApiResponse<Reservation>),
        (status = 400, description = "Validation failure"),
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::create_reservation(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reservations",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("date" = Option<String>, Query, description = "Filter by reservation date"),
    ),
    responses(
        (status = 200, description = "List reservations", body = ApiResponse<ReservationList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    let resp = reservation_service::list_reservations(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/reservations/{id}",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<Reservation>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::update_reservation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
