use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Reservation;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub purpose: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub items: Vec<Reservation>,
}
