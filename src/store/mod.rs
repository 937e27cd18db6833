//! Storage seam between the kiosk flow and the database that owns student
//! and attendance data.
//!
//! A lookup that finds nothing is `Ok(None)`; only transport or database
//! failures are errors.

pub mod local;
#[cfg(test)]
pub(crate) mod memory;
pub mod remote;

use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceEvent, AttendanceFilter};
use crate::models::direction::Direction;
use crate::models::rfid::RfidLink;
use crate::models::student::Student;
use crate::models::year_level::YearLevel;

pub use local::LocalStore;
pub use remote::RemoteStore;

pub trait AttendanceStore {
    fn find_student(&self, student_id: &str) -> AppResult<Option<Student>>;

    fn find_rfid(&self, rfid: &str) -> AppResult<Option<RfidLink>>;

    fn update_student_year(&mut self, student_id: &str, year: YearLevel) -> AppResult<()>;

    /// Append exactly one attendance row.
    fn insert_attendance(
        &mut self,
        student_id: &str,
        direction: Direction,
    ) -> AppResult<AttendanceEvent>;

    fn link_rfid(&mut self, rfid: &str, student_id: &str) -> AppResult<()>;

    fn upsert_student(&mut self, student: &Student) -> AppResult<()>;

    fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEvent>>;
}

/// Open the store selected by the configuration.
pub fn open(cfg: &Config) -> AppResult<Box<dyn AttendanceStore>> {
    Ok(match cfg.backend {
        Backend::Local => Box::new(LocalStore::open(&cfg.database)?),
        Backend::Remote => Box::new(RemoteStore::from_config(cfg)?),
    })
}
