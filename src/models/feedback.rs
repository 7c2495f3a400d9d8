use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub stars: i64,
    pub message: String,
    pub reply: Option<String>,
    pub resolved: bool,
    pub date_submitted: NaiveDateTime,
}
