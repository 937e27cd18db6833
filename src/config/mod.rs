use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use crate::models::input_mode::InputMode;

pub const ENV_REMOTE_URL: &str = "SUPABASE_URL";
pub const ENV_REMOTE_KEY: &str = "SUPABASE_ANON_KEY";

/// Where student and attendance data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite file on this machine
    #[default]
    Local,
    /// Hosted PostgREST / Supabase project
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub remote_url: String,
    #[serde(default)]
    pub remote_key: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub default_mode: InputMode,
    #[serde(default)]
    pub default_direction: Direction,
    #[serde(default = "default_scan_gap")]
    pub scan_gap_ms: u64,
    #[serde(default = "default_idle_tick")]
    pub idle_tick_ms: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_scan_gap() -> u64 {
    250
}
fn default_idle_tick() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            database: default_database(),
            remote_url: String::new(),
            remote_key: String::new(),
            request_timeout_secs: default_request_timeout(),
            default_mode: InputMode::default(),
            default_direction: Direction::default(),
            scan_gap_ms: default_scan_gap(),
            idle_tick_ms: default_idle_tick(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.rattendance`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rattendance")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the local SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Load configuration from the standard file, or defaults if not found.
    /// Remote credentials from the environment take precedence.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_from(&Self::config_file())?;
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Copy safe to print: only the last 4 characters of `remote_key` stay.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        let key = cfg.remote_key.trim();
        if !key.is_empty() {
            let tail: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            cfg.remote_key = if key.chars().count() > 8 {
                format!("********{tail}")
            } else {
                "********".to_string()
            };
        }
        cfg
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_REMOTE_URL).filter(|v| !v.trim().is_empty()) {
            self.remote_url = url;
        }
        if let Some(key) = lookup(ENV_REMOTE_KEY).filter(|v| !v.trim().is_empty()) {
            self.remote_key = key;
        }
    }

    /// Initialize configuration file and config directory.
    /// Returns the resolved database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;

            // keep an existing config, only point it at the (new) database
            let mut config = Self::load_from(&Self::config_file())?;
            config.database = db_path.to_string_lossy().to_string();

            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
