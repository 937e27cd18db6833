use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::link::LinkLogic;
use crate::errors::AppResult;
use crate::store;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Link { rfid, student_id } = cmd {
        let mut store = store::open(cfg)?;
        let student = LinkLogic::apply(&mut *store, rfid, student_id)?;
        success(format!(
            "RFID {} linked to {} ({})",
            rfid.trim(),
            student.name,
            student.student_id
        ));
    }
    Ok(())
}
