use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    entity::reservations::{
        ActiveModel as ReservationActive, Column as ReservationCol, Entity as Reservations,
        Model as ReservationModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Reservation,
    response::{ApiResponse, Meta},
    routes::params::{ReservationListQuery, SortOrder},
    services::order_service::validate_phone,
    state::AppState,
};

/// Unlike the order lifecycle, reservation status has no transition rules:
/// staff may set any of these values at any time.
const RESERVATION_STATUSES: [&str; 4] = ["Confirmed", "Pending", "Cancelled", "Completed"];

pub async fn create_reservation(
    state: &AppState,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    let phone = validate_phone(&payload.phone)?;
    if payload.guests <= 0 {
        return Err(AppError::BadRequest("Guest count must be positive".into()));
    }
    if payload.time.trim().is_empty() {
        return Err(AppError::BadRequest("Time is required".into()));
    }

    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        phone: Set(phone),
        email: Set(payload.email),
        purpose: Set(payload.purpose),
        reserved_on: Set(payload.date),
        reserved_at: Set(payload.time.trim().to_string()),
        guests: Set(payload.guests),
        status: Set("Pending".to_string()),
        notes: Set(payload.notes),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Reservation created",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
    query: ReservationListQuery,
) -> AppResult<ApiResponse<ReservationList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ReservationCol::Status.eq(status.clone()));
    }
    if let Some(date) = query.date {
        condition = condition.add(ReservationCol::ReservedOn.eq(date));
    }

    let mut finder = Reservations::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(ReservationCol::ReservedOn),
        SortOrder::Desc => finder.order_by_desc(ReservationCol::ReservedOn),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(reservation_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { items },
        Some(meta),
    ))
}

pub async fn update_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_admin(user)?;

    if let Some(status) = payload.status.as_deref() {
        if !RESERVATION_STATUSES.contains(&status) {
            return Err(AppError::BadRequest("Invalid reservation status".into()));
        }
    }

    let existing = Reservations::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: ReservationActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(Utc::now().into());
    let reservation = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_update",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": reservation.id, "status": reservation.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Reservation updated",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

fn reservation_from_entity(model: ReservationModel) -> Reservation {
    Reservation {
        id: model.id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        purpose: model.purpose,
        date: model.reserved_on,
        time: model.reserved_at,
        guests: model.guests,
        status: model.status,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
