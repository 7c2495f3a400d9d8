pub mod appointment;
pub mod feedback;
pub mod unavailability;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus, ServiceKind, TransitionError};
pub use feedback::Feedback;
pub use unavailability::StaffUnavailability;
pub use user::{Role, User};
