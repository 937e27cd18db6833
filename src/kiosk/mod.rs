//! Interactive kiosk: one input line, IN/OUT selector, and modal dialogs.

pub mod scan;
pub mod terminal;

use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::core::link::LinkLogic;
use crate::core::record::{Outcome, Prompter, RecordLogic};
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use crate::models::student::Student;
use crate::store::AttendanceStore;
use crate::ui::dialog;
use crate::utils::colors::{GREEN, GREY, RED, RESET, YELLOW};
use terminal::{Key, KeyReader, Terminal, read_line, read_yes_no, wait_ack};

const TITLE: &str = "Attendance Checker";
const HELP: &str = "[Tab] RFID / Student ID   [F1 / ←] IN   [F2 / →] OUT   [Enter] Record   [Esc] Quit";

pub struct Kiosk<'a, S: ?Sized, T> {
    store: &'a mut S,
    term: KeyReader<T>,
    session: Session,
    tick: Duration,
}

impl<'a, S, T> Kiosk<'a, S, T>
where
    S: AttendanceStore + ?Sized,
    T: Terminal,
{
    pub fn new(store: &'a mut S, term: T, session: Session, tick: Duration) -> Self {
        Self {
            store,
            term: KeyReader::new(term, session.scan_gap()),
            session,
            tick,
        }
    }

    pub fn from_config(store: &'a mut S, term: T, cfg: &Config) -> Self {
        Self::new(
            store,
            term,
            Session::from_config(cfg),
            Duration::from_millis(cfg.idle_tick_ms),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until the operator quits.
    pub fn run(&mut self) -> AppResult<()> {
        self.term
            .print(&format!("{YELLOW}{TITLE}{RESET}\n{GREY}{HELP}{RESET}\n\n"))?;
        self.redraw()?;

        loop {
            let Some((key, at)) = self.term.next_key(self.tick)? else {
                // idle: keep the input line in front of the operator
                self.redraw()?;
                continue;
            };

            match key {
                Key::Esc | Key::Interrupt => break,
                Key::Tab => self.session.toggle_mode(),
                Key::F(1) | Key::Left => self.session.set_direction(Direction::In),
                Key::F(2) | Key::Right => self.session.set_direction(Direction::Out),
                Key::Backspace => self.session.backspace(at),
                Key::Char(c) => self.session.push(c, at),
                Key::Enter => {
                    self.term.print("\n")?;
                    // a scan that dismissed a dialog is the next submission
                    let mut next = Some(self.session.take_input());
                    while let Some(input) = next {
                        next = self.submit(&input)?;
                    }
                }
                Key::F(_) => {}
            }
            self.redraw()?;
        }

        self.term.print("\n")?;
        Ok(())
    }

    fn redraw(&mut self) -> AppResult<()> {
        let dir = match self.session.direction() {
            Direction::In => format!("{GREEN}[IN]{RESET} OUT "),
            Direction::Out => format!(" IN {RED}[OUT]{RESET}"),
        };
        let line = format!(
            "{dir} {}: {}",
            self.session.mode().label(),
            self.session.input()
        );
        self.term.status_line(&line)
    }

    /// Run one submission; every outcome ends with the kiosk ready again.
    /// Returns a scan that arrived while the closing dialog was open.
    fn submit(&mut self, input: &str) -> AppResult<Option<String>> {
        let mode = self.session.mode();
        let direction = self.session.direction();

        let result = {
            let mut prompter = TermPrompter {
                term: &mut self.term,
                tick: self.tick,
            };
            RecordLogic::submit(&mut *self.store, &mut prompter, mode, direction, input)
        };

        match result {
            Ok(Outcome::Ignored) => Ok(None),
            Ok(Outcome::Cancelled) => {
                self.term.print(&format!("{GREY}Cancelled.{RESET}\n"))?;
                Ok(None)
            }
            Ok(Outcome::Recorded { student, event, .. }) => {
                debug!(student_id = %student.student_id, direction = %event.attendance_type, "attendance recorded");
                self.term.print(&dialog::success_dialog())?;
                wait_ack(&mut self.term, self.tick)
            }
            Ok(Outcome::NotFound { student_id }) => {
                self.show_error(&AppError::StudentNotFound(student_id))
            }
            Ok(Outcome::LinkRequired { rfid }) => self.link_view(&rfid),
            Err(e) if is_terminal_failure(&e) => Err(e),
            Err(e) => self.show_error(&e),
        }
    }

    /// A scanned tag nobody owns yet: offer to link it.
    fn link_view(&mut self, rfid: &str) -> AppResult<Option<String>> {
        self.term.print(&dialog::render(
            &format!("Unknown RFID tag {rfid}."),
            &["Enter the student ID to link it to, or press Esc to cancel."],
            "",
            dialog::Tone::Warn,
        ))?;

        let answer = read_line(&mut self.term, "Student ID: ", self.tick)?;
        let Some(student_id) = answer.filter(|a| !a.trim().is_empty()) else {
            self.term.print(&format!("{GREY}Link cancelled.{RESET}\n"))?;
            return Ok(None);
        };

        match LinkLogic::apply(&mut *self.store, rfid, &student_id) {
            Ok(student) => {
                self.term.print(&format!(
                    "{GREEN}RFID {rfid} linked to {} ({}). Scan again to record.{RESET}\n",
                    student.name, student.student_id
                ))?;
                Ok(None)
            }
            Err(e) if is_terminal_failure(&e) => Err(e),
            Err(e) => self.show_error(&e),
        }
    }

    fn show_error(&mut self, e: &AppError) -> AppResult<Option<String>> {
        self.term.print(&dialog::error_dialog(&e.to_string()))?;
        wait_ack(&mut self.term, self.tick)
    }
}

/// Failures of the terminal itself end the kiosk; everything else is a dialog.
fn is_terminal_failure(e: &AppError) -> bool {
    matches!(e, AppError::Io(_))
}

struct TermPrompter<'t, T> {
    term: &'t mut KeyReader<T>,
    tick: Duration,
}

impl<T: Terminal> Prompter for TermPrompter<'_, T> {
    fn loading(&mut self, message: &str) {
        let _ = self.term.print(&format!("{GREY}{message}{RESET}\n"));
    }

    fn confirm_student(&mut self, student: &Student) -> AppResult<bool> {
        self.term.print(&dialog::confirm_student(&student.name))?;
        read_yes_no(&mut *self.term, self.tick)
    }

    fn ask_year(&mut self, _student: &Student) -> AppResult<Option<String>> {
        self.term.print(&dialog::year_prompt())?;
        read_line(&mut *self.term, "Year level: ", self.tick)
    }

    fn reject_year(&mut self, error: &AppError) {
        let _ = self.term.print(&format!("{RED}{error}{RESET}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::terminal::scripted::ScriptedTerminal;
    use super::*;
    use crate::models::input_mode::InputMode;
    use crate::store::memory::MemoryStore;

    const TICK: Duration = Duration::from_millis(200);
    const GAP: Duration = Duration::from_millis(250);

    fn store() -> MemoryStore {
        let mut s = MemoryStore::default();
        s.add_student(Student::new("2021-0001", "Ana Cruz", Some(2)));
        s.add_student(Student::new("2021-0002", "Ben Reyes", Some(0)));
        s.link("0001112223", "2021-0001");
        s
    }

    fn run(store: &mut MemoryStore, mode: InputMode, term: ScriptedTerminal) -> String {
        let session = Session::new(mode, Direction::In, GAP);
        let mut kiosk = Kiosk::new(store, term, session, TICK);
        kiosk.run().unwrap();
        kiosk.term.into_inner().output
    }

    #[test]
    fn scan_confirm_and_record() {
        let mut s = store();
        let term = ScriptedTerminal::new()
            .scan("0001112223", 0)
            .key(Key::Char('y'), 1000)
            .key(Key::Enter, 2000)
            .key(Key::Esc, 3000);
        let out = run(&mut s, InputMode::Rfid, term);

        assert!(out.contains("Are you Ana Cruz?"));
        assert!(out.contains("Attendance recorded."));
        assert_eq!(s.attendance, vec![("2021-0001".to_string(), Direction::In)]);
    }

    #[test]
    fn slow_keys_before_scan_are_dropped() {
        let mut s = store();
        let term = ScriptedTerminal::new()
            .key(Key::Char('z'), 0)
            .scan("0001112223", 1000)
            .key(Key::Char('y'), 2000)
            .key(Key::Enter, 3000)
            .key(Key::Esc, 4000);
        run(&mut s, InputMode::Rfid, term);
        assert_eq!(s.attendance.len(), 1);
    }

    #[test]
    fn out_direction_and_year_prompt_in_id_mode() {
        let mut s = store();
        let term = ScriptedTerminal::new()
            .key(Key::F(2), 0)
            .scan("2021-0002", 100)
            .key(Key::Char('y'), 1000)
            .key(Key::Char('4'), 2000)
            .key(Key::Enter, 2100)
            .key(Key::Enter, 3000)
            .key(Key::Esc, 4000);
        let out = run(&mut s, InputMode::Id, term);

        assert!(out.contains("Please input your year level"));
        assert_eq!(s.students["2021-0002"].year, Some(4));
        assert_eq!(s.attendance, vec![("2021-0002".to_string(), Direction::Out)]);
    }

    #[test]
    fn unknown_tag_opens_link_view() {
        let mut s = store();
        let term = ScriptedTerminal::new()
            .scan("9999", 0)
            .key(Key::Char('2'), 500)
            .key(Key::Char('0'), 510)
            .key(Key::Char('2'), 520)
            .key(Key::Char('1'), 530)
            .key(Key::Char('-'), 540)
            .key(Key::Char('0'), 550)
            .key(Key::Char('0'), 560)
            .key(Key::Char('0'), 570)
            .key(Key::Char('2'), 580)
            .key(Key::Enter, 590)
            .key(Key::Esc, 1000);
        let out = run(&mut s, InputMode::Rfid, term);

        assert!(out.contains("Unknown RFID tag 9999."));
        assert!(out.contains("RFID 9999 linked to Ben Reyes"));
        assert_eq!(s.links["9999"], "2021-0002");
        assert!(s.attendance.is_empty());
    }

    #[test]
    fn not_found_shows_error_dialog_and_keeps_running() {
        let mut s = store();
        let term = ScriptedTerminal::new()
            .scan("nobody", 0)
            .key(Key::Enter, 500)
            .idle()
            .key(Key::Esc, 1000);
        let out = run(&mut s, InputMode::Id, term);
        assert!(out.contains("Student with ID \"nobody\" not found."));
        assert!(s.attendance.is_empty());
    }

    #[test]
    fn store_errors_are_shown_not_fatal() {
        let mut s = store();
        s.fail_inserts = true;
        let term = ScriptedTerminal::new()
            .scan("2021-0001", 0)
            .key(Key::Char('y'), 1000)
            .key(Key::Enter, 2000)
            .key(Key::Esc, 3000);
        let out = run(&mut s, InputMode::Id, term);
        assert!(out.contains("500 - insert rejected"));
    }

    #[test]
    fn enter_on_empty_input_does_nothing() {
        let mut s = store();
        let term = ScriptedTerminal::new().key(Key::Enter, 0).key(Key::Esc, 10);
        let out = run(&mut s, InputMode::Rfid, term);
        assert!(!out.contains("Looking for student information"));
        assert_eq!(s.total_calls(), 0);
    }

    #[test]
    fn next_scan_cannot_confirm_the_previous_student() {
        let mut s = store();
        s.link("0002223334", "2021-0002");
        let term = ScriptedTerminal::new()
            .scan("0001112223", 0)
            .scan("0002223334", 5000)
            .key(Key::Enter, 6000)
            .key(Key::Char('n'), 7000)
            .key(Key::Esc, 8000);
        let out = run(&mut s, InputMode::Rfid, term);

        assert!(out.contains("Scan ignored"));
        assert!(!out.contains("Attendance recorded."));
        assert!(s.attendance.is_empty());
    }

    #[test]
    fn scan_during_success_dialog_starts_next_submission() {
        let mut s = store();
        s.add_student(Student::new("2021-0002", "Ben Reyes", Some(1)));
        s.link("0002223334", "2021-0002");
        let term = ScriptedTerminal::new()
            .scan("0001112223", 0)
            .key(Key::Char('y'), 1000)
            .scan("0002223334", 3000)
            .key(Key::Char('y'), 4000)
            .key(Key::Enter, 5000)
            .key(Key::Esc, 6000);
        let out = run(&mut s, InputMode::Rfid, term);

        assert!(out.contains("Are you Ben Reyes?"));
        assert_eq!(
            s.attendance,
            vec![
                ("2021-0001".to_string(), Direction::In),
                ("2021-0002".to_string(), Direction::In),
            ]
        );
    }

    #[test]
    fn tab_switches_mode() {
        let mut s = store();
        let term = ScriptedTerminal::new().key(Key::Tab, 0).key(Key::Esc, 10);
        let session = Session::new(InputMode::Rfid, Direction::In, GAP);
        let mut kiosk = Kiosk::new(&mut s, term, session, TICK);
        kiosk.run().unwrap();
        assert_eq!(kiosk.session().mode(), InputMode::Id);
        assert!(kiosk.term.into_inner().output.contains("Student ID Input"));
    }
}
