pub mod admin;
pub mod auth;
pub mod bookings;
pub mod feedback;
pub mod gallery;
pub mod health;
pub mod staff;
