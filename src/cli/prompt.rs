//! Line-based prompter for one-shot commands (`record`).

use std::io::{self, BufRead, Write};

use crate::core::record::Prompter;
use crate::errors::AppResult;
use crate::models::student::Student;
use crate::ui::dialog;
use crate::ui::messages::{error, loading};

pub struct CliPrompter<R> {
    input: R,
    assume_yes: bool,
    year: Option<String>,
}

impl CliPrompter<io::StdinLock<'static>> {
    pub fn stdin(assume_yes: bool, year: Option<String>) -> Self {
        Self::new(io::stdin().lock(), assume_yes, year)
    }
}

impl<R: BufRead> CliPrompter<R> {
    pub fn new(input: R, assume_yes: bool, year: Option<String>) -> Self {
        Self {
            input,
            assume_yes,
            year,
        }
    }

    /// `None` on end of input.
    fn read_answer(&mut self) -> AppResult<Option<String>> {
        io::stdout().flush().ok();
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead> Prompter for CliPrompter<R> {
    fn loading(&mut self, message: &str) {
        loading(message);
    }

    fn confirm_student(&mut self, student: &Student) -> AppResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        print!("{}", dialog::confirm_student(&student.name));
        print!("Answer [y/N]: ");
        let answer = self.read_answer()?.unwrap_or_default().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn ask_year(&mut self, _student: &Student) -> AppResult<Option<String>> {
        // a --year value is used once; a rejected one falls through to asking
        if let Some(y) = self.year.take() {
            return Ok(Some(y));
        }
        if self.assume_yes {
            return Ok(None);
        }
        print!("{}", dialog::year_prompt());
        print!("Year level: ");
        self.read_answer()
    }

    fn reject_year(&mut self, e: &crate::errors::AppError) {
        error(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Student {
        Student::new("1", "Ana", None)
    }

    #[test]
    fn answers_come_from_input() {
        let mut p = CliPrompter::new("yes\n2\n".as_bytes(), false, None);
        assert!(p.confirm_student(&ana()).unwrap());
        assert_eq!(p.ask_year(&ana()).unwrap(), Some("2".into()));
        assert_eq!(p.ask_year(&ana()).unwrap(), None);
    }

    #[test]
    fn assume_yes_never_reads() {
        let mut p = CliPrompter::new("".as_bytes(), true, Some("3".into()));
        assert!(p.confirm_student(&ana()).unwrap());
        assert_eq!(p.ask_year(&ana()).unwrap(), Some("3".into()));
        assert_eq!(p.ask_year(&ana()).unwrap(), None);
    }

    #[test]
    fn end_of_input_declines() {
        let mut p = CliPrompter::new("".as_bytes(), false, None);
        assert!(!p.confirm_student(&ana()).unwrap());
    }
}
