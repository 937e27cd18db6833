//! In-memory store and scripted prompter for unit tests.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use chrono::Local;

use crate::core::record::Prompter;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, AttendanceFilter};
use crate::models::direction::Direction;
use crate::models::rfid::RfidLink;
use crate::models::student::Student;
use crate::models::year_level::YearLevel;
use crate::store::AttendanceStore;

#[derive(Default)]
pub struct MemoryStore {
    pub students: HashMap<String, Student>,
    pub links: HashMap<String, String>,
    pub attendance: Vec<(String, Direction)>,
    pub calls: usize,
    pub fail_inserts: bool,
    reads: Cell<usize>,
}

impl MemoryStore {
    pub fn add_student(&mut self, s: Student) {
        self.students.insert(s.student_id.clone(), s);
    }

    pub fn link(&mut self, rfid: &str, student_id: &str) {
        self.links.insert(rfid.to_string(), student_id.to_string());
    }

    fn touch(&self) {
        self.reads.set(self.reads.get() + 1);
    }

    pub fn total_calls(&self) -> usize {
        self.calls + self.reads.get()
    }
}

impl AttendanceStore for MemoryStore {
    fn find_student(&self, student_id: &str) -> AppResult<Option<Student>> {
        self.touch();
        Ok(self.students.get(student_id).cloned())
    }

    fn find_rfid(&self, rfid: &str) -> AppResult<Option<RfidLink>> {
        self.touch();
        Ok(self.links.get(rfid).map(|id| RfidLink {
            rfid: rfid.to_string(),
            student_id: id.clone(),
        }))
    }

    fn update_student_year(&mut self, student_id: &str, year: YearLevel) -> AppResult<()> {
        self.calls += 1;
        let s = self
            .students
            .get_mut(student_id)
            .ok_or_else(|| AppError::StudentNotFound(student_id.to_string()))?;
        s.year = Some(year.get() as i64);
        Ok(())
    }

    fn insert_attendance(
        &mut self,
        student_id: &str,
        direction: Direction,
    ) -> AppResult<AttendanceEvent> {
        self.calls += 1;
        if self.fail_inserts {
            return Err(AppError::Remote {
                code: "500".into(),
                message: "insert rejected".into(),
            });
        }
        self.attendance.push((student_id.to_string(), direction));
        Ok(AttendanceEvent {
            student_id: student_id.to_string(),
            attendance_type: direction,
            created_at: Local::now(),
        })
    }

    fn link_rfid(&mut self, rfid: &str, student_id: &str) -> AppResult<()> {
        self.calls += 1;
        self.link(rfid, student_id);
        Ok(())
    }

    fn upsert_student(&mut self, student: &Student) -> AppResult<()> {
        self.calls += 1;
        self.add_student(student.clone());
        Ok(())
    }

    fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEvent>> {
        self.touch();
        let now = Local::now();
        Ok(self
            .attendance
            .iter()
            .map(|(id, d)| AttendanceEvent {
                student_id: id.clone(),
                attendance_type: *d,
                created_at: now,
            })
            .filter(|ev| filter.matches(ev))
            .collect())
    }
}

/// Prompter that replays canned answers and records what it was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    confirm_answer: bool,
    years: VecDeque<String>,
    pub loading: Vec<&'static str>,
    pub confirmed: Vec<String>,
    pub years_asked: usize,
    pub rejected: usize,
}

impl ScriptedPrompter {
    pub fn yes() -> Self {
        Self::default().with_confirm(true)
    }

    pub fn with_confirm(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn with_years(mut self, answers: &[&str]) -> Self {
        self.years = answers.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn loading(&mut self, message: &str) {
        use crate::core::record::{MSG_LOOKUP, MSG_RECORDING, MSG_UPDATE_YEAR};
        let known = [MSG_LOOKUP, MSG_UPDATE_YEAR, MSG_RECORDING];
        if let Some(m) = known.into_iter().find(|k| *k == message) {
            self.loading.push(m);
        }
    }

    fn confirm_student(&mut self, student: &Student) -> AppResult<bool> {
        self.confirmed.push(student.name.clone());
        Ok(self.confirm_answer)
    }

    fn ask_year(&mut self, _student: &Student) -> AppResult<Option<String>> {
        self.years_asked += 1;
        Ok(self.years.pop_front())
    }

    fn reject_year(&mut self, _error: &AppError) {
        self.rejected += 1;
    }
}
