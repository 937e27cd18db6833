use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::kiosk::Kiosk;
use crate::kiosk::terminal::CrosstermTerminal;
use crate::models::direction::Direction;
use crate::store;

/// Handle the `kiosk` command: run the interactive screen until Esc.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Kiosk { mode, out } = cmd {
        let mut cfg = cfg.clone();
        if let Some(m) = mode {
            cfg.default_mode = *m;
        }
        if *out {
            cfg.default_direction = Direction::Out;
        }

        let mut store = store::open(&cfg)?;
        let term = CrosstermTerminal::enter()?;
        Kiosk::from_config(&mut *store, term, &cfg).run()?;
    }
    Ok(())
}
