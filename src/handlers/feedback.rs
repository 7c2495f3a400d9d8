use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Feedback, Role};
use crate::state::AppState;

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub username: String,
    pub stars: i64,
    pub message: String,
    pub reply: Option<String>,
    pub resolved: bool,
    pub date_submitted: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(fb: Feedback) -> Self {
        Self {
            id: fb.id,
            username: fb.username,
            stars: fb.stars,
            message: fb.message,
            reply: fb.reply,
            resolved: fb.resolved,
            date_submitted: fb.date_submitted.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// GET /api/feedback
pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let feedback = queries::list_feedback(&db)?;
    Ok(Json(feedback.into_iter().map(Into::into).collect()))
}

// POST /api/feedback
#[derive(Deserialize)]
pub struct SubmitFeedbackRequest {
    pub stars: i64,
    pub message: String,
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    if user.role != Role::Client {
        return Err(AppError::Forbidden("only clients can leave feedback".into()));
    }
    if !(1..=5).contains(&req.stars) {
        return Err(AppError::Validation("stars must be between 1 and 5".into()));
    }
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("feedback message is required".into()));
    }

    let db = state.db.lock().unwrap();
    if queries::feedback_exists_for(&db, user.id)? {
        return Err(AppError::Conflict("you have already submitted feedback".into()));
    }

    let id = queries::insert_feedback(&db, user.id, &user.username, req.stars, message)?;
    let feedback = queries::get_feedback(&db, id)?
        .ok_or_else(|| AppError::NotFound("feedback".into()))?;

    Ok((StatusCode::CREATED, Json(feedback.into())))
}
