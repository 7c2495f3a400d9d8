use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use marmu::config::AppConfig;
use marmu::db;
use marmu::services::mail::MailgunMailer;
use marmu::services::otp::OtpStore;
use marmu::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.mailgun_api_key.is_empty() {
        tracing::warn!("MAILGUN_API_KEY is not set; outbound email will fail");
    }
    let mailer = MailgunMailer::new(
        config.mailgun_api_key.clone(),
        config.mailgun_domain.clone(),
        config.mail_from.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        mailer: Box::new(mailer),
        otp: OtpStore::new(config.otp_expiry_minutes),
    });

    let app = marmu::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
