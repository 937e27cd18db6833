//! Keystroke buffer for the kiosk input line.
//!
//! RFID readers act as keyboards that type the tag and press Enter in one
//! quick burst. In RFID mode a keystroke arriving more than `gap` after the
//! previous one starts a fresh buffer, so stray slow typing never merges
//! with a scan.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ScanBuffer {
    buf: String,
    gap: Duration,
    debounce: bool,
    last_key: Option<Instant>,
}

impl ScanBuffer {
    pub fn new(gap: Duration, debounce: bool) -> Self {
        Self {
            buf: String::new(),
            gap,
            debounce,
            last_key: None,
        }
    }

    pub fn gap(&self) -> Duration {
        self.gap
    }

    pub fn set_debounce(&mut self, debounce: bool) {
        self.debounce = debounce;
        self.clear();
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.stamp(now);
        self.buf.push(c);
    }

    pub fn backspace(&mut self, now: Instant) {
        self.stamp(now);
        self.buf.pop();
    }

    fn stamp(&mut self, now: Instant) {
        if self.debounce
            && let Some(prev) = self.last_key
            && now.saturating_duration_since(prev) > self.gap
        {
            self.buf.clear();
        }
        self.last_key = Some(now);
    }

    /// Hand the buffered text to the caller and start over.
    pub fn take(&mut self) -> String {
        self.last_key = None;
        std::mem::take(&mut self.buf)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.last_key = None;
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}
