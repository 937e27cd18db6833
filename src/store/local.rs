use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, AttendanceFilter};
use crate::models::direction::Direction;
use crate::models::rfid::RfidLink;
use crate::models::student::Student;
use crate::models::year_level::YearLevel;
use crate::store::AttendanceStore;

/// SQLite-backed store. Every write also lands in the internal `log` table.
pub struct LocalStore {
    pool: DbPool,
}

impl LocalStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::new(path)?,
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::in_memory()?,
        })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl AttendanceStore for LocalStore {
    fn find_student(&self, student_id: &str) -> AppResult<Option<Student>> {
        queries::find_student(&self.pool.conn, student_id)
    }

    fn find_rfid(&self, rfid: &str) -> AppResult<Option<RfidLink>> {
        queries::find_rfid(&self.pool.conn, rfid)
    }

    fn update_student_year(&mut self, student_id: &str, year: YearLevel) -> AppResult<()> {
        if queries::update_student_year(&self.pool.conn, student_id, year)? == 0 {
            return Err(AppError::StudentNotFound(student_id.to_string()));
        }
        ttlog_soft(
            &self.pool.conn,
            "year",
            student_id,
            &format!("Year level set to {}", year),
        );
        Ok(())
    }

    fn insert_attendance(
        &mut self,
        student_id: &str,
        direction: Direction,
    ) -> AppResult<AttendanceEvent> {
        let ev = queries::insert_attendance(&self.pool.conn, student_id, direction)?;
        ttlog_soft(
            &self.pool.conn,
            "attendance",
            student_id,
            &format!("Recorded {} attendance", direction),
        );
        Ok(ev)
    }

    fn link_rfid(&mut self, rfid: &str, student_id: &str) -> AppResult<()> {
        queries::link_rfid(&self.pool.conn, rfid, student_id)?;
        ttlog_soft(
            &self.pool.conn,
            "link",
            student_id,
            &format!("RFID {} linked", rfid),
        );
        Ok(())
    }

    fn upsert_student(&mut self, student: &Student) -> AppResult<()> {
        queries::upsert_student(&self.pool.conn, student)?;
        ttlog_soft(
            &self.pool.conn,
            "student",
            &student.student_id,
            &format!("Student saved: {}", student.name),
        );
        Ok(())
    }

    fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEvent>> {
        queries::list_attendance(&self.pool.conn, filter)
    }
}
