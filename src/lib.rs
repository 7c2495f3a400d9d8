pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full route table, shared between the binary and the integration tests.
pub fn router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/current_user", get(handlers::auth::current_user))
        .route("/api/auth/change_password", post(handlers::auth::change_password))
        .route("/api/auth/send_otp", post(handlers::auth::send_otp))
        .route("/api/auth/reset_password", post(handlers::auth::reset_password))
        .route("/api/auth/signup/send_otp", post(handlers::auth::signup_send_otp))
        .route("/api/auth/signup/verify", post(handlers::auth::signup_verify))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route(
            "/api/bookings/user/:username",
            get(handlers::bookings::bookings_for_user),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/bookings/available_slots",
            get(handlers::bookings::available_slots),
        )
        .route(
            "/api/staff/unavailability",
            post(handlers::staff::set_unavailability),
        )
        .route(
            "/api/staff/unavailability/list",
            get(handlers::staff::list_unavailability),
        )
        .route(
            "/api/staff/by-service/:service",
            get(handlers::staff::staff_by_service),
        )
        .route("/api/feedback", get(handlers::feedback::list_feedback))
        .route("/api/feedback", post(handlers::feedback::submit_feedback))
        .route("/api/admin/dashboard-data", get(handlers::admin::dashboard_data))
        .route(
            "/api/admin/appointments/summary",
            get(handlers::admin::appointments_summary),
        )
        .route(
            "/api/admin/appointments/monthly-report",
            get(handlers::admin::monthly_report),
        )
        .route("/api/admin/appointments", get(handlers::admin::list_appointments))
        .route(
            "/api/admin/appointments/:id",
            put(handlers::admin::update_appointment_status),
        )
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/add_user", post(handlers::admin::add_user))
        .route("/api/admin/feedback", get(handlers::admin::list_feedback))
        .route(
            "/api/admin/feedback/:id/reply",
            post(handlers::admin::reply_to_feedback),
        )
        .route(
            "/api/admin/feedback/:id/resolve",
            post(handlers::admin::resolve_feedback),
        )
        .route("/api/services/images", get(handlers::gallery::service_images))
        .nest_service("/assets", assets)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
