use axum::{Json, Router, routing::get};

use crate::{
    coupons,
    dto::orders::{CouponDto, CouponList},
    response::{ApiResponse, Meta},
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_coupons))
}

#[utoipa::path(
    get,
    path = "/api/coupons",
    responses(
        (status = 200, description = "Available coupons", body = ApiResponse<CouponList>),
    ),
    tag = "Coupons"
)]
pub async fn list_coupons() -> Json<ApiResponse<CouponList>> {
    let items = coupons::coupon_book()
        .iter()
        .map(|c| CouponDto {
            code: c.code.to_string(),
            description: c.description.to_string(),
            min_order: c.min_order,
            freebie: c.freebie.map(str::to_string),
        })
        .collect();

    Json(ApiResponse::success(
        "Coupons",
        CouponList { items },
        Some(Meta::empty()),
    ))
}
