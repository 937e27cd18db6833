use crate::cli::parser::Commands;
use crate::cli::prompt::CliPrompter;
use crate::config::Config;
use crate::core::record::{Outcome, RecordLogic};
use crate::errors::{AppError, AppResult};
use crate::models::input_mode::InputMode;
use crate::store;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_direction;

/// Handle the `record` command: one submission outside the kiosk.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Record {
        id,
        rfid,
        out,
        year,
        yes,
    } = cmd
    {
        let mode = if *rfid { InputMode::Rfid } else { InputMode::Id };
        let direction = Commands::direction(*out);

        let mut store = store::open(cfg)?;
        let mut prompter = CliPrompter::stdin(*yes, year.clone());

        match RecordLogic::submit(&mut *store, &mut prompter, mode, direction, id)? {
            Outcome::Ignored => return Err(AppError::Missing("student ID or RFID".into())),
            Outcome::Cancelled => warning("Cancelled. No attendance recorded."),
            Outcome::NotFound { student_id } => {
                return Err(AppError::StudentNotFound(student_id));
            }
            Outcome::LinkRequired { rfid } => {
                info(format!(
                    "Link it first: rattendance link {} <STUDENT_ID>",
                    rfid
                ));
                return Err(AppError::RfidNotLinked(rfid));
            }
            Outcome::Recorded {
                student,
                event,
                year_updated,
            } => {
                if year_updated && let Some(y) = student.year_level() {
                    info(format!("Year level set to {}", y));
                }
                success(format!(
                    "Attendance recorded: {} ({}) {} at {}",
                    student.name,
                    student.student_id,
                    colorize_direction(event.attendance_type.to_db_str(), event.attendance_type.is_in()),
                    event.created_at.format("%Y-%m-%d %H:%M:%S"),
                ));
            }
        }
    }
    Ok(())
}
