use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::ServiceKind;
use crate::services::slots::{self, BusinessHours};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("appointment date must be in the future")]
    PastDate,

    #[error("the shop is closed at the requested time")]
    OutsideBusinessHours,

    #[error("that time slot is no longer available")]
    SlotTaken,

    #[error("a {service} appointment was already booked within the last {days} days")]
    Cooldown { service: &'static str, days: i64 },

    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Every check a new appointment must pass, in the order the client would
/// want them reported. `today` is passed in rather than read from the clock.
pub fn validate_booking(
    conn: &Connection,
    account_id: i64,
    service: ServiceKind,
    date: NaiveDate,
    slot: &str,
    staff_id: i64,
    today: NaiveDate,
    hours: &BusinessHours,
    cooldown_days: i64,
) -> Result<(), BookingError> {
    if date <= today {
        return Err(BookingError::PastDate);
    }
    if !slots::within_business_hours(date, slot, hours) {
        return Err(BookingError::OutsideBusinessHours);
    }
    if queries::is_staff_unavailable(conn, staff_id, date, slot)? {
        return Err(BookingError::SlotTaken);
    }
    if queries::slot_taken(conn, date, slot, staff_id)? {
        return Err(BookingError::SlotTaken);
    }

    let cutoff = today - Duration::days(cooldown_days);
    if queries::service_bookings_since(conn, account_id, service, cutoff)? > 0 {
        return Err(BookingError::Cooldown {
            service: service.as_str(),
            days: cooldown_days,
        });
    }

    Ok(())
}
