use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub account_id: i64,
    pub fullname: String,
    pub service: ServiceKind,
    pub date: NaiveDate,
    pub time: String,
    pub remarks: String,
    pub status: AppointmentStatus,
    pub staff_id: i64,
    pub staff_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Appointment {
    /// Start of the appointment, for "has it happened yet" checks.
    /// Slot labels are hour-aligned `HH:MM`; an unparseable label is treated
    /// as start of day so a malformed row never blocks completion forever.
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        self.date.and_time(time)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceKind {
    Haircut,
    Tattoo,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Haircut => "Haircut",
            ServiceKind::Tattoo => "Tattoo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "haircut" => Some(ServiceKind::Haircut),
            "tattoo" => Some(ServiceKind::Tattoo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Denied,
    Completed,
    Abandoned,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Approved => "Approved",
            AppointmentStatus::Denied => "Denied",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Abandoned => "Abandoned",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(AppointmentStatus::Pending),
            "approved" => Some(AppointmentStatus::Approved),
            "denied" => Some(AppointmentStatus::Denied),
            "completed" => Some(AppointmentStatus::Completed),
            "abandoned" => Some(AppointmentStatus::Abandoned),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Denied, Completed, Abandoned and Cancelled accept no further changes.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Denied
                | AppointmentStatus::Completed
                | AppointmentStatus::Abandoned
                | AppointmentStatus::Cancelled
        )
    }

    /// Admin-side lifecycle: Pending -> Approved/Denied, and
    /// Approved -> Completed/Abandoned once the appointment has taken place.
    /// Only an admin may move an appointment through these states.
    pub fn review(self, to: AppointmentStatus, in_past: bool, actor: Role) -> Result<(), TransitionError> {
        if !actor.is_admin() {
            return Err(TransitionError::AdminOnly);
        }
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        match (self, to) {
            (AppointmentStatus::Pending, AppointmentStatus::Approved)
            | (AppointmentStatus::Pending, AppointmentStatus::Denied) => Ok(()),
            (AppointmentStatus::Approved, AppointmentStatus::Completed)
            | (AppointmentStatus::Approved, AppointmentStatus::Abandoned) => {
                if !in_past {
                    return Err(TransitionError::NotYetElapsed);
                }
                Ok(())
            }
            (from, to) => Err(TransitionError::Illegal { from, to }),
        }
    }

    /// Client-side lifecycle: the owning client may cancel any non-terminal,
    /// future-dated appointment. Ownership is checked by the caller.
    pub fn cancel(self, in_past: bool) -> Result<(), TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        if in_past {
            return Err(TransitionError::AlreadyStarted);
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TransitionError {
    Terminal(AppointmentStatus),
    Illegal {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    NotYetElapsed,
    AdminOnly,
    AlreadyStarted,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::Terminal(status) => {
                write!(f, "appointment is already {} and accepts no further changes", status.as_str())
            }
            TransitionError::Illegal { from, to } => {
                write!(f, "cannot move an appointment from {} to {}", from.as_str(), to.as_str())
            }
            TransitionError::NotYetElapsed => {
                write!(f, "appointment has not taken place yet")
            }
            TransitionError::AdminOnly => {
                write!(f, "only an admin can review appointments")
            }
            TransitionError::AlreadyStarted => {
                write!(f, "past appointments can no longer be cancelled")
            }
        }
    }
}
