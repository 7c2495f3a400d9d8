use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, ServiceKind};
use crate::services::slots::{self, BusinessHours};
use crate::state::AppState;

// POST /api/staff/unavailability
#[derive(Deserialize)]
pub struct SetUnavailabilityRequest {
    pub date: String,
    pub slots: Vec<String>,
    // Admins declare on behalf of a staff member; staff leave this unset.
    pub staff_id: Option<i64>,
}

pub async fn set_unavailability(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SetUnavailabilityRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !user.role.is_staff() && !user.role.is_admin() {
        return Err(AppError::Forbidden("only staff or admins can declare unavailability".into()));
    }

    let date = NaiveDate::parse_from_str(&req.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be YYYY-MM-DD".into()))?;
    if date <= Utc::now().date_naive() {
        return Err(AppError::Validation("unavailability date must be in the future".into()));
    }

    let hours = BusinessHours::from_config(&state.config);
    for slot in &req.slots {
        if !slots::within_business_hours(date, slot, &hours) {
            return Err(AppError::Validation(format!(
                "{slot} is outside business hours for {date}"
            )));
        }
    }

    let db = state.db.lock().unwrap();

    let target_id = if user.role.is_admin() {
        let staff_id = req.staff_id.ok_or_else(|| {
            AppError::Validation("staff_id is required when declaring on behalf of staff".into())
        })?;
        let target = queries::get_account(&db, staff_id)?
            .ok_or_else(|| AppError::NotFound("staff member".into()))?;
        if !target.role.is_staff() {
            return Err(AppError::Validation(format!(
                "{} is not a staff account",
                target.username
            )));
        }
        target.id
    } else {
        if req.staff_id.is_some_and(|id| id != user.id) {
            return Err(AppError::Forbidden(
                "staff can only declare their own unavailability".into(),
            ));
        }
        user.id
    };

    queries::replace_unavailability(&db, target_id, date, &req.slots)?;

    Ok(Json(serde_json::json!({
        "message": "unavailability saved",
        "staff_id": target_id,
        "date": req.date,
        "slots": req.slots,
    })))
}

// GET /api/staff/unavailability/list
#[derive(Serialize)]
pub struct UnavailabilityEntry {
    pub staff_id: i64,
    pub staff_name: String,
    pub date: String,
    pub slot: String,
}

pub async fn list_unavailability(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<UnavailabilityEntry>>, AppError> {
    if !user.role.is_staff() && !user.role.is_admin() {
        return Err(AppError::Forbidden("staff or admin access required".into()));
    }

    let db = state.db.lock().unwrap();
    let entries = queries::list_unavailability(&db)?;

    // Admins see the whole calendar, staff only their own entries.
    let entries = entries
        .into_iter()
        .filter(|(entry, _)| user.role.is_admin() || entry.staff_id == user.id)
        .map(|(entry, staff_name)| UnavailabilityEntry {
            staff_id: entry.staff_id,
            staff_name,
            date: entry.date.format("%Y-%m-%d").to_string(),
            slot: entry.slot,
        })
        .collect();

    Ok(Json(entries))
}

// GET /api/staff/by-service/:service
#[derive(Serialize)]
pub struct StaffMember {
    pub id: i64,
    pub fullname: String,
}

pub async fn staff_by_service(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(service): Path<String>,
) -> Result<Json<Vec<StaffMember>>, AppError> {
    let service = ServiceKind::parse(&service)
        .ok_or_else(|| AppError::Validation("unknown service".into()))?;

    let db = state.db.lock().unwrap();
    let staff = queries::list_staff_by_role(&db, Role::for_service(service))?;

    Ok(Json(
        staff
            .into_iter()
            .map(|(id, fullname)| StaffMember { id, fullname })
            .collect(),
    ))
}
