use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::student::string_or_number;

/// One appended attendance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub student_id: String,
    pub attendance_type: Direction,
    pub created_at: DateTime<Local>,
}

impl AttendanceEvent {
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn time_str(&self) -> String {
        self.created_at.format("%H:%M:%S").to_string()
    }
}

/// Optional filters for reading events back (list / export).
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub student_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub direction: Option<Direction>,
}

impl AttendanceFilter {
    pub fn matches(&self, ev: &AttendanceEvent) -> bool {
        self.student_id
            .as_deref()
            .is_none_or(|id| ev.student_id == id)
            && self.date.is_none_or(|d| ev.date() == d)
            && self.direction.is_none_or(|d| ev.attendance_type == d)
    }
}
