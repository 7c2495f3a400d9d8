use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, is_strong_password, is_valid_email, CurrentUser};
use crate::db::queries::{self, AppointmentFilter};
use crate::errors::AppError;
use crate::handlers::auth::UserResponse;
use crate::handlers::bookings::AppointmentResponse;
use crate::handlers::feedback::FeedbackResponse;
use crate::models::{AppointmentStatus, Role, TransitionError, User};
use crate::services::mail;
use crate::state::AppState;

fn require_admin(user: &User) -> Result<(), AppError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin access required".into()))
    }
}

fn require_staff_or_admin(user: &User) -> Result<(), AppError> {
    if user.role.is_admin() || user.role.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden("staff or admin access required".into()))
    }
}

const DEFAULT_PER_PAGE: i64 = 10;

fn page_params(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    (page.unwrap_or(1).max(1), per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, 100))
}

// GET /api/admin/dashboard-data
#[derive(Serialize)]
pub struct DashboardResponse {
    pub clients: i64,
    pub pending_appointments: i64,
    pub unanswered_feedback: i64,
    pub top_artists: Vec<ArtistPerformance>,
}

#[derive(Serialize)]
pub struct ArtistPerformance {
    pub name: String,
    pub completed_jobs: i64,
}

pub async fn dashboard_data(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardResponse>, AppError> {
    require_admin(&user)?;

    let db = state.db.lock().unwrap();
    let clients = queries::count_clients(&db)?;
    let pending_appointments = queries::pending_appointment_count(&db)?;
    let unanswered_feedback = queries::unanswered_feedback_count(&db)?;
    let top_artists = queries::artist_performance(&db, 5)?
        .into_iter()
        .map(|(name, completed_jobs)| ArtistPerformance { name, completed_jobs })
        .collect();

    Ok(Json(DashboardResponse {
        clients,
        pending_appointments,
        unanswered_feedback,
        top_artists,
    }))
}

// GET /api/admin/appointments/summary
#[derive(Serialize)]
pub struct SummaryResponse {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
}

pub async fn appointments_summary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SummaryResponse>, AppError> {
    require_admin(&user)?;

    let db = state.db.lock().unwrap();
    let summary = queries::appointment_summary(&db)?;
    Ok(Json(SummaryResponse {
        total: summary.total,
        pending: summary.pending,
        approved: summary.approved,
    }))
}

// GET /api/admin/appointments/monthly-report
#[derive(Deserialize)]
pub struct MonthlyReportQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Serialize)]
pub struct MonthlyReportResponse {
    pub year: i32,
    pub month: u32,
    pub haircut: i64,
    pub tattoo: i64,
}

pub async fn monthly_report(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<MonthlyReportResponse>, AppError> {
    require_admin(&user)?;

    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("month must be between 1 and 12".into()));
    }

    let db = state.db.lock().unwrap();
    let (haircut, tattoo) = queries::monthly_service_counts(&db, year, month)?;
    Ok(Json(MonthlyReportResponse { year, month, haircut, tattoo }))
}

// GET /api/admin/appointments
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub artist: Option<String>,
    pub sort: Option<String>,
    pub history: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct AppointmentPage {
    pub appointments: Vec<AppointmentResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<AppointmentPage>, AppError> {
    require_staff_or_admin(&user)?;

    let status = match query.status.as_deref() {
        Some(s) if !s.is_empty() => Some(
            AppointmentStatus::parse(s)
                .ok_or_else(|| AppError::Validation("unknown status filter".into()))?,
        ),
        _ => None,
    };

    let (page, per_page) = page_params(query.page, query.per_page);
    let history = query.history.unwrap_or(false);

    let filter = AppointmentFilter {
        q: query.q.as_deref().filter(|q| !q.is_empty()),
        status,
        artist: query.artist.as_deref().filter(|a| !a.is_empty()),
        // Staff only ever see their own schedule.
        staff_id: if user.role.is_staff() { Some(user.id) } else { None },
        history_only: status.is_none() && history,
        exclude_history: status.is_none() && !history,
        sort: query.sort.as_deref(),
        page,
        per_page,
    };

    let db = state.db.lock().unwrap();
    let (appointments, total) = queries::list_appointments(&db, &filter)?;

    Ok(Json(AppointmentPage {
        appointments: appointments.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
    }))
}

// PUT /api/admin/appointments/:id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn map_transition_error(e: TransitionError) -> AppError {
    match e {
        TransitionError::AdminOnly => AppError::Forbidden(e.to_string()),
        _ => AppError::Conflict(e.to_string()),
    }
}

pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    require_admin(&user)?;

    let to = AppointmentStatus::parse(&req.status)
        .ok_or_else(|| AppError::Validation("unknown status".into()))?;

    let (updated, client_email) = {
        let db = state.db.lock().unwrap();
        let apt = queries::get_appointment(&db, &id)?
            .ok_or_else(|| AppError::NotFound("appointment".into()))?;

        let in_past = apt.starts_at() <= Utc::now().naive_utc();
        apt.status
            .review(to, in_past, user.role)
            .map_err(map_transition_error)?;

        queries::update_appointment_status(&db, &apt.id, to)?;
        let updated = queries::get_appointment(&db, &apt.id)?
            .ok_or_else(|| AppError::NotFound("appointment".into()))?;
        let email = queries::get_account(&db, updated.account_id)?.map(|u| u.email);
        (updated, email)
    };

    // Notify the client, but never fail the transition over a mail outage.
    if let Some(email) = client_email {
        let (subject, html) = mail::appointment_status_email(
            &updated.fullname,
            updated.service.as_str(),
            &updated.date.format("%Y-%m-%d").to_string(),
            &updated.time,
            to.as_str(),
        );
        if let Err(e) = state.mailer.send(&email, &subject, &html).await {
            tracing::warn!(appointment = %updated.id, "status notification failed: {e:#}");
        }
    }

    tracing::info!(appointment = %updated.id, status = to.as_str(), "appointment reviewed");

    Ok(Json(updated.into()))
}

// GET /api/admin/users
#[derive(Deserialize)]
pub struct UsersQuery {
    pub role: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct UserPage {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UserPage>, AppError> {
    require_admin(&user)?;

    let role_filter = match query.role.as_deref() {
        Some(r) if !r.is_empty() => {
            Some(Role::parse(r).ok_or_else(|| AppError::Validation("unknown role filter".into()))?)
        }
        _ => None,
    };
    let (page, per_page) = page_params(query.page, query.per_page);

    let db = state.db.lock().unwrap();
    let (users, total) = queries::list_users(
        &db,
        role_filter,
        query.sort.as_deref().unwrap_or("name"),
        page,
        per_page,
    )?;

    Ok(Json(UserPage {
        users: users.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
    }))
}

// POST /api/admin/add_user
#[derive(Deserialize)]
pub struct AddUserRequest {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    require_admin(&user)?;

    let role = Role::parse(&req.role)
        .ok_or_else(|| AppError::Validation("unknown role".into()))?;
    if req.username.trim().is_empty() || req.fullname.trim().is_empty() {
        return Err(AppError::Validation("username and full name are required".into()));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("a valid Gmail address is required".into()));
    }
    if !is_strong_password(&req.password) {
        return Err(AppError::Validation(
            "password must be at least 8 characters with a letter and a digit".into(),
        ));
    }

    let db = state.db.lock().unwrap();
    if queries::username_or_email_taken(&db, req.username.trim(), &req.email)? {
        return Err(AppError::Conflict("username or email is already registered".into()));
    }

    let id = queries::create_account(
        &db,
        req.username.trim(),
        req.fullname.trim(),
        &req.email.to_lowercase(),
        &hash_password(&req.password),
        role,
    )?;
    let created = queries::get_account(&db, id)?
        .ok_or_else(|| AppError::NotFound("account".into()))?;

    tracing::info!(username = %created.username, role = role.as_str(), "account created by admin");

    Ok((StatusCode::CREATED, Json(created.into())))
}

// GET /api/admin/feedback
#[derive(Deserialize)]
pub struct FeedbackQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct FeedbackPage {
    pub feedback: Vec<FeedbackResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<FeedbackPage>, AppError> {
    require_admin(&user)?;

    let resolved = match query.status.as_deref() {
        Some("resolved") => Some(true),
        Some("pending") => Some(false),
        Some("") | None => None,
        Some(_) => return Err(AppError::Validation("status must be resolved or pending".into())),
    };
    let (page, per_page) = page_params(query.page, query.per_page);

    let db = state.db.lock().unwrap();
    let (feedback, total) = queries::list_feedback_filtered(
        &db,
        resolved,
        query.q.as_deref().filter(|q| !q.is_empty()),
        query.sort.as_deref(),
        page,
        per_page,
    )?;

    Ok(Json(FeedbackPage {
        feedback: feedback.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
    }))
}

// POST /api/admin/feedback/:id/reply
#[derive(Deserialize)]
pub struct ReplyRequest {
    pub reply: String,
}

pub async fn reply_to_feedback(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<ReplyRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    require_admin(&user)?;

    let reply = req.reply.trim();
    if reply.is_empty() {
        return Err(AppError::Validation("reply must not be empty".into()));
    }

    let (updated, author_email) = {
        let db = state.db.lock().unwrap();
        let feedback = queries::get_feedback(&db, id)?
            .ok_or_else(|| AppError::NotFound("feedback".into()))?;

        queries::set_feedback_reply(&db, feedback.id, reply)?;
        let updated = queries::get_feedback(&db, feedback.id)?
            .ok_or_else(|| AppError::NotFound("feedback".into()))?;
        let email = queries::get_account(&db, updated.account_id)?.map(|u| u.email);
        (updated, email)
    };

    if let Some(email) = author_email {
        let (subject, html) =
            mail::feedback_reply_email(&updated.username, &updated.message, reply);
        if let Err(e) = state.mailer.send(&email, &subject, &html).await {
            tracing::warn!(feedback = updated.id, "reply notification failed: {e:#}");
        }
    }

    Ok(Json(updated.into()))
}

// POST /api/admin/feedback/:id/resolve
#[derive(Deserialize)]
pub struct ResolveRequest {
    pub resolved: bool,
}

pub async fn resolve_feedback(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    require_admin(&user)?;

    let db = state.db.lock().unwrap();
    if !queries::set_feedback_resolved(&db, id, req.resolved)? {
        return Err(AppError::NotFound("feedback".into()));
    }
    let updated = queries::get_feedback(&db, id)?
        .ok_or_else(|| AppError::NotFound("feedback".into()))?;

    Ok(Json(updated.into()))
}
