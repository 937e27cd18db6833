//! Per-kiosk transient state: what is typed, how, and in which direction.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::kiosk::scan::ScanBuffer;
use crate::models::direction::Direction;
use crate::models::input_mode::InputMode;

#[derive(Debug, Clone)]
pub struct Session {
    mode: InputMode,
    direction: Direction,
    input: ScanBuffer,
}

impl Session {
    pub fn new(mode: InputMode, direction: Direction, scan_gap: Duration) -> Self {
        Self {
            mode,
            direction,
            input: ScanBuffer::new(scan_gap, mode.is_rfid()),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.default_mode,
            cfg.default_direction,
            Duration::from_millis(cfg.scan_gap_ms),
        )
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Longest pause between two keys of one reader burst.
    pub fn scan_gap(&self) -> Duration {
        self.input.gap()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Switching mode always discards what was typed so far.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.input.set_debounce(mode.is_rfid());
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.input.push(c, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        self.input.backspace(now);
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    /// Take the buffer for submission; the session is ready for the next one.
    pub fn take_input(&mut self) -> String {
        self.input.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_change_clears_buffer_but_keeps_direction() {
        let now = Instant::now();
        let mut s = Session::new(InputMode::Id, Direction::Out, Duration::from_millis(250));
        s.push('4', now);
        s.push('2', now);
        s.toggle_mode();
        assert_eq!(s.mode(), InputMode::Rfid);
        assert_eq!(s.input(), "");
        assert_eq!(s.direction(), Direction::Out);
    }

    #[test]
    fn take_input_resets_for_next_submission() {
        let now = Instant::now();
        let mut s = Session::new(InputMode::Rfid, Direction::In, Duration::from_millis(250));
        s.push('7', now);
        assert_eq!(s.take_input(), "7");
        assert_eq!(s.input(), "");
        assert_eq!(s.mode(), InputMode::Rfid);
    }
}
