use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::student::Student;
use crate::store::AttendanceStore;

/// Business logic for linking a new RFID tag to an existing student.
pub struct LinkLogic;

impl LinkLogic {
    pub fn apply<S>(store: &mut S, rfid: &str, student_id: &str) -> AppResult<Student>
    where
        S: AttendanceStore + ?Sized,
    {
        let rfid = rfid.trim();
        let student_id = student_id.trim();
        if rfid.is_empty() {
            return Err(AppError::Missing("RFID tag".into()));
        }
        if student_id.is_empty() {
            return Err(AppError::Missing("student ID".into()));
        }

        let student = store
            .find_student(student_id)?
            .ok_or_else(|| AppError::StudentNotFound(student_id.to_string()))?;

        store.link_rfid(rfid, &student.student_id)?;
        debug!(rfid, student_id, "linked");
        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn links_existing_student() {
        let mut s = MemoryStore::default();
        s.add_student(Student::new("7", "Cy", Some(1)));
        let st = LinkLogic::apply(&mut s, " 00FF ", "7").unwrap();
        assert_eq!(st.name, "Cy");
        assert_eq!(s.links["00FF"], "7");
    }

    #[test]
    fn unknown_student_is_rejected_without_writing() {
        let mut s = MemoryStore::default();
        let err = LinkLogic::apply(&mut s, "00FF", "8").unwrap_err();
        assert!(matches!(err, AppError::StudentNotFound(id) if id == "8"));
        assert!(s.links.is_empty());
    }

    #[test]
    fn blank_values_are_missing() {
        let mut s = MemoryStore::default();
        assert!(matches!(
            LinkLogic::apply(&mut s, "  ", "8"),
            Err(AppError::Missing(_))
        ));
        assert!(matches!(
            LinkLogic::apply(&mut s, "00FF", ""),
            Err(AppError::Missing(_))
        ));
    }
}
