use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Role, ServiceKind};
use crate::services::booking::{self, BookingError};
use crate::services::slots::{self, BusinessHours};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub fullname: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub remarks: String,
    pub status: String,
    pub staff_name: String,
    pub created_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(apt: Appointment) -> Self {
        Self {
            id: apt.id,
            fullname: apt.fullname,
            service: apt.service.as_str().to_string(),
            date: apt.date.format("%Y-%m-%d").to_string(),
            time: apt.time,
            remarks: apt.remarks,
            status: apt.status.as_str().to_string(),
            staff_name: apt.staff_name,
            created_at: apt.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be YYYY-MM-DD".into()))
}

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::PastDate | BookingError::OutsideBusinessHours => {
            AppError::Validation(e.to_string())
        }
        BookingError::SlotTaken | BookingError::Cooldown { .. } => AppError::Conflict(e.to_string()),
        BookingError::Db(e) => AppError::Internal(e),
    }
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub service: String,
    pub date: String,
    pub time: String,
    pub staff_id: i64,
    #[serde(default)]
    pub remarks: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    if user.role != Role::Client {
        return Err(AppError::Forbidden("only clients can book appointments".into()));
    }

    let service = ServiceKind::parse(&req.service)
        .ok_or_else(|| AppError::Validation("unknown service".into()))?;
    let date = parse_date(&req.date)?;
    let hours = BusinessHours::from_config(&state.config);
    let today = Utc::now().date_naive();

    let db = state.db.lock().unwrap();

    let staff = queries::get_account(&db, req.staff_id)?
        .ok_or_else(|| AppError::NotFound("staff member".into()))?;
    if staff.role != Role::for_service(service) {
        return Err(AppError::Validation(format!(
            "{} does not perform {} appointments",
            staff.fullname,
            service.as_str()
        )));
    }

    booking::validate_booking(
        &db,
        user.id,
        service,
        date,
        &req.time,
        staff.id,
        today,
        &hours,
        state.config.booking_cooldown_days,
    )
    .map_err(map_booking_error)?;

    let now = Utc::now().naive_utc();
    let apt = Appointment {
        id: Uuid::new_v4().to_string(),
        account_id: user.id,
        fullname: user.fullname.clone(),
        service,
        date,
        time: req.time.clone(),
        remarks: req.remarks.trim().to_string(),
        status: AppointmentStatus::Pending,
        staff_id: staff.id,
        staff_name: staff.fullname.clone(),
        created_at: now,
        updated_at: now,
    };
    queries::create_appointment(&db, &apt)?;

    tracing::info!(appointment = %apt.id, service = service.as_str(), "appointment booked");

    Ok((StatusCode::CREATED, Json(apt.into())))
}

// GET /api/bookings/user/:username
pub async fn bookings_for_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let db = state.db.lock().unwrap();

    let target = queries::get_account_by_username(&db, &username)?
        .ok_or_else(|| AppError::NotFound("account".into()))?;
    if target.id != user.id && !user.role.is_admin() {
        return Err(AppError::Forbidden("you can only view your own appointments".into()));
    }

    let appointments = queries::appointments_for_account(&db, target.id)?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let db = state.db.lock().unwrap();

    let apt = queries::get_appointment(&db, &id)?
        .ok_or_else(|| AppError::NotFound("appointment".into()))?;
    if apt.account_id != user.id {
        return Err(AppError::Forbidden("you can only cancel your own appointments".into()));
    }

    let in_past = apt.starts_at() <= Utc::now().naive_utc();
    apt.status
        .cancel(in_past)
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    queries::update_appointment_status(&db, &apt.id, AppointmentStatus::Cancelled)?;
    let updated = queries::get_appointment(&db, &apt.id)?
        .ok_or_else(|| AppError::NotFound("appointment".into()))?;

    Ok(Json(updated.into()))
}

// GET /api/bookings/available_slots?date=YYYY-MM-DD&staff_id=N
#[derive(Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: String,
    pub staff_id: i64,
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let date = parse_date(&query.date)?;
    let hours = BusinessHours::from_config(&state.config);

    let db = state.db.lock().unwrap();
    let unavailable = queries::unavailability_slots(&db, query.staff_id, date)?;
    let booked = queries::booked_slots(&db, date, query.staff_id)?;

    Ok(Json(slots::available_slots(date, &hours, &unavailable, &booked)))
}
