use crate::errors::AppResult;
use crate::export::model::{AttendanceExport, get_headers};
use ::csv::Writer;
use std::path::Path;

/// Write the rows as CSV to the given file.
pub(crate) fn write_csv(path: &Path, rows: &[AttendanceExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(get_headers())?;

    for r in rows {
        wtr.write_record([
            &r.student_id,
            &r.date,
            &r.time,
            &r.attendance_type,
            &r.created_at,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
