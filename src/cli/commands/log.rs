use crate::cli::parser::Commands;
use crate::config::{Backend, Config};
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        if cfg.backend != Backend::Local {
            return Err(AppError::Config(
                "the internal log is only kept by the local backend".into(),
            ));
        }
        let pool = DbPool::new(&cfg.database)?;
        LogLogic::print_log(&pool)?;
    }

    Ok(())
}
