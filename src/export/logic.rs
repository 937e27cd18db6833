// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::csv::write_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::write_json;
use crate::export::model::AttendanceExport;
use crate::export::{ExportFormat, notify_export_success};
use crate::models::attendance::AttendanceFilter;
use crate::store::AttendanceStore;
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;

pub struct ExportLogic;

impl ExportLogic {
    /// Export attendance events matching `filter` to `file`.
    ///
    /// The output path must be absolute (after `~` expansion). An existing
    /// file is only replaced with `force` or after confirmation.
    pub fn export<S>(
        store: &S,
        format: ExportFormat,
        file: &str,
        filter: &AttendanceFilter,
        force: bool,
    ) -> AppResult<usize>
    where
        S: AttendanceStore + ?Sized,
    {
        let path = expand_tilde(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(&path, force)?;

        let rows: Vec<AttendanceExport> = store
            .list_attendance(filter)?
            .iter()
            .map(AttendanceExport::from)
            .collect();

        if rows.is_empty() {
            warning("No attendance events found for the selected filter.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => write_csv(&path, &rows)?,
            ExportFormat::Json => write_json(&path, &rows)?,
        }

        notify_export_success(format.as_str(), &path, rows.len());
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::direction::Direction;
    use crate::models::student::Student;
    use crate::store::memory::MemoryStore;

    fn temp_out(name: &str, ext: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("{name}_rattendance_unit.{ext}"));
        std::fs::remove_file(&p).ok();
        p
    }

    #[test]
    fn relative_paths_are_rejected() {
        let s = MemoryStore::default();
        let err = ExportLogic::export(
            &s,
            ExportFormat::Csv,
            "out.csv",
            &AttendanceFilter::default(),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let mut s = MemoryStore::default();
        s.add_student(Student::new("1", "Ana", Some(1)));
        s.attendance.push(("1".into(), Direction::In));
        s.attendance.push(("1".into(), Direction::Out));

        let path = temp_out("csv_rows", "csv");
        let n = ExportLogic::export(
            &s,
            ExportFormat::Csv,
            path.to_str().unwrap(),
            &AttendanceFilter::default(),
            false,
        )
        .unwrap();
        assert_eq!(n, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("student_id,date,time,attendance_type,created_at")
        );
        assert!(lines.next().unwrap().contains(",IN,"));
        assert!(lines.next().unwrap().contains(",OUT,"));
    }
}
