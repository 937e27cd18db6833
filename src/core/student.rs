use crate::errors::{AppError, AppResult};
use crate::models::student::Student;
use crate::models::year_level::YearLevel;
use crate::store::AttendanceStore;

/// Registering / renaming students from the admin CLI.
pub struct StudentLogic;

impl StudentLogic {
    pub fn save<S>(
        store: &mut S,
        student_id: &str,
        name: &str,
        year: Option<&str>,
    ) -> AppResult<Student>
    where
        S: AttendanceStore + ?Sized,
    {
        let student_id = student_id.trim();
        let name = name.trim();
        if student_id.is_empty() {
            return Err(AppError::Missing("student ID".into()));
        }
        if name.is_empty() {
            return Err(AppError::Missing("student name".into()));
        }

        let year = match year {
            Some(y) => Some(YearLevel::parse(y)?.get() as i64),
            // keep a previously stored year when only renaming
            None => store.find_student(student_id)?.and_then(|s| s.year),
        };

        let student = Student::new(student_id, name, year);
        store.upsert_student(&student)?;
        Ok(student)
    }

    pub fn show<S>(store: &S, student_id: &str) -> AppResult<Student>
    where
        S: AttendanceStore + ?Sized,
    {
        store
            .find_student(student_id.trim())?
            .ok_or_else(|| AppError::StudentNotFound(student_id.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn rename_keeps_existing_year() {
        let mut s = MemoryStore::default();
        StudentLogic::save(&mut s, "1", "Ana", Some("2")).unwrap();
        let renamed = StudentLogic::save(&mut s, "1", "Ana Cruz", None).unwrap();
        assert_eq!(renamed.year, Some(2));
        assert_eq!(StudentLogic::show(&s, "1").unwrap().name, "Ana Cruz");
    }

    #[test]
    fn invalid_year_is_rejected() {
        let mut s = MemoryStore::default();
        assert!(matches!(
            StudentLogic::save(&mut s, "1", "Ana", Some("9")),
            Err(AppError::InvalidYear(_))
        ));
        assert!(s.students.is_empty());
    }
}
