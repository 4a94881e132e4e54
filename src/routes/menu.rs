use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::menu::{MenuResponse, SaveMenuRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_menu))
}

/// Admin-only menu endpoints, mounted under `/api/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/menu", put(save_menu))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Full menu", body = ApiResponse<MenuResponse>),
    ),
    tag = "Menu"
)]
pub async fn get_menu(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MenuResponse>>> {
    let resp = menu_service::get_menu(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu",
    request_body = SaveMenuRequest,
    responses(
        (status = 200, description = "Menu saved", body = ApiResponse<MenuResponse>),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn save_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SaveMenuRequest>,
) -> AppResult<Json<ApiResponse<MenuResponse>>> {
    let resp = menu_service::save_menu(&state, &user, payload).await?;
    Ok(Json(resp))
}
