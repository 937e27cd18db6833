use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the operator identifies a student at the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Scanned RFID tag, resolved through the RFID mapping table.
    #[default]
    Rfid,
    /// Student identifier typed by hand.
    #[value(alias = "student-id")]
    Id,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Rfid => InputMode::Id,
            InputMode::Id => InputMode::Rfid,
        }
    }

    pub fn is_rfid(&self) -> bool {
        matches!(self, InputMode::Rfid)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Rfid => "RFID Input",
            InputMode::Id => "Student ID Input",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputMode::Rfid => "rfid",
            InputMode::Id => "id",
        })
    }
}
