//! Submission flow: identifier → student → (year prompt) → one attendance row.

use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceEvent;
use crate::models::direction::Direction;
use crate::models::input_mode::InputMode;
use crate::models::student::Student;
use crate::models::year_level::YearLevel;
use crate::store::AttendanceStore;

pub const MSG_LOOKUP: &str = "Looking for student information...";
pub const MSG_UPDATE_YEAR: &str = "Updating year level...";
pub const MSG_RECORDING: &str = "Recording attendance...";

/// Operator interaction needed while a submission is in flight.
pub trait Prompter {
    /// Show a transient "busy" message.
    fn loading(&mut self, message: &str);

    /// "Are you NAME?" Returns `false` when the operator answers no.
    fn confirm_student(&mut self, student: &Student) -> AppResult<bool>;

    /// Ask for the year level. `None` means the operator backed out.
    fn ask_year(&mut self, student: &Student) -> AppResult<Option<String>>;

    /// The last year answer was rejected; the flow will ask again.
    fn reject_year(&mut self, error: &AppError);
}

/// How a submission ended. Store failures are reported as `Err` instead.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Blank input; nothing was looked up.
    Ignored,
    /// The scanned tag is not linked to any student yet.
    LinkRequired { rfid: String },
    NotFound { student_id: String },
    /// The operator declined the confirmation or the year prompt.
    Cancelled,
    Recorded {
        student: Student,
        event: AttendanceEvent,
        year_updated: bool,
    },
}

impl Outcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Outcome::Recorded { .. })
    }
}

pub struct RecordLogic;

impl RecordLogic {
    /// Run one submission. At most one attendance row is written.
    pub fn submit<S, P>(
        store: &mut S,
        prompter: &mut P,
        mode: InputMode,
        direction: Direction,
        input: &str,
    ) -> AppResult<Outcome>
    where
        S: AttendanceStore + ?Sized,
        P: Prompter + ?Sized,
    {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Outcome::Ignored);
        }

        debug!(%mode, %direction, input, "submit");
        prompter.loading(MSG_LOOKUP);

        let student_id = match mode {
            InputMode::Rfid => match store.find_rfid(input)? {
                Some(link) => link.student_id,
                None => {
                    debug!(rfid = input, "unknown tag");
                    return Ok(Outcome::LinkRequired {
                        rfid: input.to_string(),
                    });
                }
            },
            InputMode::Id => input.to_string(),
        };

        let Some(student) = store.find_student(&student_id)? else {
            return Ok(Outcome::NotFound { student_id });
        };
        debug!(?student, "found");

        if !prompter.confirm_student(&student)? {
            return Ok(Outcome::Cancelled);
        }

        let mut year_updated = false;
        let student = if student.has_valid_year() {
            student
        } else {
            let Some(year) = Self::prompt_year(prompter, &student)? else {
                return Ok(Outcome::Cancelled);
            };

            prompter.loading(MSG_UPDATE_YEAR);
            store.update_student_year(&student.student_id, year)?;
            year_updated = true;

            // re-read, the confirmation already happened
            match store.find_student(&student.student_id)? {
                Some(s) => s,
                None => {
                    return Ok(Outcome::NotFound {
                        student_id: student.student_id,
                    });
                }
            }
        };

        prompter.loading(MSG_RECORDING);
        let event = store.insert_attendance(&student.student_id, direction)?;
        debug!(student_id = %student.student_id, %direction, "recorded");

        Ok(Outcome::Recorded {
            student,
            event,
            year_updated,
        })
    }

    fn prompt_year<P>(prompter: &mut P, student: &Student) -> AppResult<Option<YearLevel>>
    where
        P: Prompter + ?Sized,
    {
        loop {
            let Some(answer) = prompter.ask_year(student)? else {
                return Ok(None);
            };
            match YearLevel::parse(&answer) {
                Ok(year) => return Ok(Some(year)),
                Err(e) => prompter.reject_year(&e),
            }
        }
    }
}
