use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{
    clear_session_cookie, hash_password, is_strong_password, is_valid_email, session_cookie,
    sign_session, CurrentUser,
};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::mail;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            fullname: user.fullname,
            email: user.email,
            role: user.role.as_str().to_string(),
        }
    }
}

fn validate_signup_fields(
    username: &str,
    fullname: &str,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    if username.trim().is_empty() || fullname.trim().is_empty() {
        return Err(AppError::Validation("username and full name are required".into()));
    }
    if !is_valid_email(email) {
        return Err(AppError::Validation("a valid Gmail address is required".into()));
    }
    if !is_strong_password(password) {
        return Err(AppError::Validation(
            "password must be at least 8 characters with a letter and a digit".into(),
        ));
    }
    Ok(())
}

// POST /api/auth/signup/send_otp
#[derive(Deserialize)]
pub struct SignupOtpRequest {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
}

pub async fn signup_send_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate_signup_fields(&req.username, &req.fullname, &req.email, &req.password)?;

    {
        let db = state.db.lock().unwrap();
        if queries::username_or_email_taken(&db, &req.username, &req.email)? {
            return Err(AppError::Conflict("username or email is already registered".into()));
        }
    }

    let code = state.otp.issue(&req.email);
    let (subject, html) = mail::otp_email(&code, state.config.otp_expiry_minutes);
    state
        .mailer
        .send(&req.email, &subject, &html)
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    Ok(Json(serde_json::json!({ "message": "verification code sent" })))
}

// POST /api/auth/signup/verify
#[derive(Deserialize)]
pub struct SignupVerifyRequest {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub otp: String,
}

pub async fn signup_verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupVerifyRequest>,
) -> Result<Response, AppError> {
    validate_signup_fields(&req.username, &req.fullname, &req.email, &req.password)?;

    if !state.otp.verify(&req.email, &req.otp) {
        return Err(AppError::Validation("invalid or expired verification code".into()));
    }

    let user = {
        let db = state.db.lock().unwrap();
        if queries::username_or_email_taken(&db, &req.username, &req.email)? {
            return Err(AppError::Conflict("username or email is already registered".into()));
        }
        // Self-service signup always creates a client account.
        let id = queries::create_account(
            &db,
            req.username.trim(),
            req.fullname.trim(),
            &req.email.to_lowercase(),
            &hash_password(&req.password),
            Role::Client,
        )?;
        queries::get_account(&db, id)?.ok_or_else(|| AppError::NotFound("account".into()))?
    };

    let token = sign_session(user.id, user.role, state.config.session_key.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session: {e}")))?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(serde_json::json!({ "user": UserResponse::from(user), "token": token })),
    )
        .into_response())
}

// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let record = {
        let db = state.db.lock().unwrap();
        queries::find_account_by_login(&db, req.username.trim())?
    };

    let Some(record) = record else {
        return Err(AppError::Unauthorized);
    };
    if record.hash_pass != hash_password(&req.password) {
        return Err(AppError::Unauthorized);
    }

    let user = record.user;
    let token = sign_session(user.id, user.role, state.config.session_key.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session: {e}")))?;

    tracing::info!(username = %user.username, role = %user.role.as_str(), "login");

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(serde_json::json!({ "user": UserResponse::from(user), "token": token })),
    )
        .into_response())
}

// POST /api/auth/logout
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({ "message": "logged out" })),
    )
        .into_response()
}

// GET /api/auth/current_user
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

// POST /api/auth/change_password
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !is_strong_password(&req.new_password) {
        return Err(AppError::Validation(
            "password must be at least 8 characters with a letter and a digit".into(),
        ));
    }

    let db = state.db.lock().unwrap();
    let current_hash = queries::get_password_hash(&db, &user.username)?
        .ok_or_else(|| AppError::NotFound("account".into()))?;
    if current_hash != hash_password(&req.old_password) {
        return Err(AppError::Validation("current password is incorrect".into()));
    }

    queries::update_password_by_username(&db, &user.username, &hash_password(&req.new_password))?;
    Ok(Json(serde_json::json!({ "message": "password updated" })))
}

// POST /api/auth/send_otp  (password reset)
#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let known = {
        let db = state.db.lock().unwrap();
        queries::email_exists(&db, &req.email.to_lowercase())?
    };
    if !known {
        return Err(AppError::NotFound("no account with that email".into()));
    }

    let code = state.otp.issue(&req.email);
    let (subject, html) = mail::otp_email(&code, state.config.otp_expiry_minutes);
    state
        .mailer
        .send(&req.email, &subject, &html)
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    Ok(Json(serde_json::json!({ "message": "verification code sent" })))
}

// POST /api/auth/reset_password
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !is_strong_password(&req.new_password) {
        return Err(AppError::Validation(
            "password must be at least 8 characters with a letter and a digit".into(),
        ));
    }
    if !state.otp.verify(&req.email, &req.otp) {
        return Err(AppError::Validation("invalid or expired verification code".into()));
    }

    let db = state.db.lock().unwrap();
    let updated = queries::update_password_by_email(
        &db,
        &req.email.to_lowercase(),
        &hash_password(&req.new_password),
    )?;
    if !updated {
        return Err(AppError::NotFound("no account with that email".into()));
    }

    Ok(Json(serde_json::json!({ "message": "password reset" })))
}
