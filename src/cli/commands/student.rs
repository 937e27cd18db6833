use crate::cli::parser::{Commands, StudentAction};
use crate::config::Config;
use crate::core::student::StudentLogic;
use crate::errors::AppResult;
use crate::store;
use crate::ui::messages::{header, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Student { action } = cmd {
        let mut store = store::open(cfg)?;

        match action {
            StudentAction::Add { id, name, year } => {
                let s = StudentLogic::save(&mut *store, id, name, year.as_deref())?;
                success(format!("Student {} saved: {}", s.student_id, s.name));
            }
            StudentAction::Show { id } => {
                let s = StudentLogic::show(&*store, id)?;
                let year = s
                    .year_level()
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".to_string());
                header(format!("Student {}", s.student_id));
                println!("Student ID : {}", s.student_id);
                println!("Name       : {}", s.name);
                println!("Year level : {}", year);
            }
        }
    }
    Ok(())
}
