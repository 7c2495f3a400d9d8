use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::mail::Mailer;
use crate::services::otp::OtpStore;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub mailer: Box<dyn Mailer>,
    pub otp: OtpStore,
}
