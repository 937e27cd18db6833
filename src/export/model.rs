// src/export/model.rs

use serde::Serialize;

use crate::models::attendance::AttendanceEvent;

/// Flat row used by every export format.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AttendanceExport {
    pub student_id: String,
    pub date: String,
    pub time: String,
    pub attendance_type: String,
    pub created_at: String,
}

impl From<&AttendanceEvent> for AttendanceExport {
    fn from(ev: &AttendanceEvent) -> Self {
        Self {
            student_id: ev.student_id.clone(),
            date: ev.date().format("%Y-%m-%d").to_string(),
            time: ev.time_str(),
            attendance_type: ev.attendance_type.to_db_str().to_string(),
            created_at: ev.created_at.to_rfc3339(),
        }
    }
}

/// Header for CSV
pub(crate) fn get_headers() -> [&'static str; 5] {
    ["student_id", "date", "time", "attendance_type", "created_at"]
}
