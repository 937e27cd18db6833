use crate::cli::commands::list::build_filter;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::store;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        student,
        date,
        force,
    } = cmd
    {
        let filter = build_filter(student, date, None)?;
        let store = store::open(cfg)?;
        ExportLogic::export(&*store, *format, file, &filter, *force)?;
    }
    Ok(())
}
