use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub session_key: String,
    pub mailgun_api_key: String,
    pub mailgun_domain: String,
    pub mail_from: String,
    pub assets_dir: String,
    pub open_hour: u32,
    pub weekday_close_hour: u32,
    pub saturday_close_hour: u32,
    pub booking_cooldown_days: i64,
    pub otp_expiry_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "marmu.db".to_string()),
            session_key: env::var("SESSION_KEY").unwrap_or_else(|_| "changeme".to_string()),
            mailgun_api_key: env::var("MAILGUN_API_KEY").unwrap_or_default(),
            mailgun_domain: env::var("MAILGUN_DOMAIN").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Marmu Barber & Tattoo Shop <no-reply@marmu.shop>".to_string()),
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()),
            open_hour: env::var("OPEN_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9),
            weekday_close_hour: env::var("WEEKDAY_CLOSE_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(21),
            saturday_close_hour: env::var("SATURDAY_CLOSE_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(17),
            booking_cooldown_days: env::var("BOOKING_COOLDOWN_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(14),
            otp_expiry_minutes: env::var("OTP_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
