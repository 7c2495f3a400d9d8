use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A staff-declared exclusion of one slot from availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUnavailability {
    pub staff_id: i64,
    pub date: NaiveDate,
    pub slot: String,
}
