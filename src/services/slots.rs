use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::AppConfig;

/// Weekly business-hour rules. The closing boundary differs between weekdays
/// and Saturday and has changed over the shop's lifetime, so both hours come
/// from configuration rather than constants.
#[derive(Debug, Clone, Copy)]
pub struct BusinessHours {
    pub open_hour: u32,
    pub weekday_close_hour: u32,
    pub saturday_close_hour: u32,
}

impl BusinessHours {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            open_hour: config.open_hour,
            weekday_close_hour: config.weekday_close_hour,
            saturday_close_hour: config.saturday_close_hour,
        }
    }

    /// Closing hour for a date, or None when the shop is closed (Sunday).
    pub fn closing_hour(&self, date: NaiveDate) -> Option<u32> {
        match date.weekday() {
            Weekday::Sun => None,
            Weekday::Sat => Some(self.saturday_close_hour),
            _ => Some(self.weekday_close_hour),
        }
    }

    /// All hour-aligned slot labels for a date, ignoring bookings and
    /// unavailability. Open hour up to but excluding the closing hour.
    pub fn slots_for(&self, date: NaiveDate) -> Vec<String> {
        let Some(close) = self.closing_hour(date) else {
            return vec![];
        };
        (self.open_hour..close).map(slot_label).collect()
    }
}

pub fn slot_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// Remaining bookable slots for a date and staff member: the day's slot set
/// minus staff-declared unavailability minus already-booked times. Recomputed
/// fresh on every call.
pub fn available_slots(
    date: NaiveDate,
    hours: &BusinessHours,
    unavailable: &[String],
    booked: &[String],
) -> Vec<String> {
    hours
        .slots_for(date)
        .into_iter()
        .filter(|slot| !unavailable.contains(slot) && !booked.contains(slot))
        .collect()
}

/// Whether a slot label falls inside business hours for the date.
pub fn within_business_hours(date: NaiveDate, slot: &str, hours: &BusinessHours) -> bool {
    hours.slots_for(date).iter().any(|s| s == slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours() -> BusinessHours {
        BusinessHours {
            open_hour: 9,
            weekday_close_hour: 21,
            saturday_close_hour: 17,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_sunday_is_closed() {
        // 2024-06-09 is a Sunday
        assert!(available_slots(date("2024-06-09"), &hours(), &[], &[]).is_empty());
    }

    #[test]
    fn test_weekday_full_sequence() {
        // 2024-06-10 is a Monday
        let slots = available_slots(date("2024-06-10"), &hours(), &[], &[]);
        assert_eq!(slots.len(), 12);
        assert_eq!(slots.first().unwrap(), "09:00");
        assert_eq!(slots.last().unwrap(), "20:00");
    }

    #[test]
    fn test_saturday_closes_early() {
        // 2024-06-08 is a Saturday
        let slots = available_slots(date("2024-06-08"), &hours(), &[], &[]);
        assert_eq!(
            slots,
            vec!["09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00"]
        );
    }

    #[test]
    fn test_unavailability_removes_exactly_one_slot() {
        let all = available_slots(date("2024-06-08"), &hours(), &[], &[]);
        let marked = vec!["11:00".to_string()];
        let remaining = available_slots(date("2024-06-08"), &hours(), &marked, &[]);
        assert_eq!(remaining.len(), all.len() - 1);
        assert!(!remaining.contains(&"11:00".to_string()));
        for slot in &all {
            if slot != "11:00" {
                assert!(remaining.contains(slot));
            }
        }
    }

    #[test]
    fn test_bookings_and_unavailability_both_subtract() {
        let unavailable = vec!["10:00".to_string()];
        let booked = vec!["09:00".to_string(), "13:00".to_string()];
        let slots = available_slots(date("2024-06-10"), &hours(), &unavailable, &booked);
        assert!(!slots.contains(&"09:00".to_string()));
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(!slots.contains(&"13:00".to_string()));
        assert!(slots.contains(&"11:00".to_string()));
    }

    #[test]
    fn test_configured_closing_pair() {
        let custom = BusinessHours {
            open_hour: 9,
            weekday_close_hour: 18,
            saturday_close_hour: 14,
        };
        assert_eq!(custom.slots_for(date("2024-06-10")).len(), 9);
        assert_eq!(custom.slots_for(date("2024-06-08")).len(), 5);
    }

    #[test]
    fn test_within_business_hours() {
        assert!(within_business_hours(date("2024-06-08"), "16:00", &hours()));
        assert!(!within_business_hours(date("2024-06-08"), "17:00", &hours()));
        assert!(!within_business_hours(date("2024-06-09"), "10:00", &hours()));
        assert!(!within_business_hours(date("2024-06-10"), "08:00", &hours()));
    }
}
