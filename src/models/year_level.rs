use serde::Serialize;
use std::fmt;

use crate::errors::{AppError, AppResult};

pub const MIN_YEAR: u8 = 1;
pub const MAX_YEAR: u8 = 4;

/// A student's year level. Only 1..=4 can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct YearLevel(u8);

impl YearLevel {
    pub fn new(value: i64) -> Option<Self> {
        if (MIN_YEAR as i64..=MAX_YEAR as i64).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    /// Parse operator input ("3", " 2 ").
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        trimmed
            .parse::<i64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| AppError::InvalidYear(trimmed.to_string()))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
