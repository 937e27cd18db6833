//! Key input and screen output for the kiosk.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue, style};

use tracing::debug;

use crate::errors::AppResult;
use crate::utils::colors::{RESET, YELLOW};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Left,
    Right,
    F(u8),
    Esc,
    /// Ctrl-C
    Interrupt,
}

pub trait Terminal {
    /// Wait up to `timeout` for a key press. `None` is an idle tick.
    fn next_key(&mut self, timeout: Duration) -> AppResult<Option<(Key, Instant)>>;

    /// Print a block of text (may span several lines).
    fn print(&mut self, text: &str) -> AppResult<()>;

    /// Redraw the current input line in place.
    fn status_line(&mut self, text: &str) -> AppResult<()>;
}

/// Real terminal in raw mode; raw mode ends when this is dropped.
pub struct CrosstermTerminal {
    out: Stdout,
}

impl CrosstermTerminal {
    pub fn enter() -> AppResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { out: io::stdout() })
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = writeln!(self.out);
    }
}

fn map_key(ev: KeyEvent) -> Option<Key> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    let key = match ev.code {
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::F(n) => Key::F(n),
        KeyCode::Esc => Key::Esc,
        _ => return None,
    };
    Some(key)
}

impl Terminal for CrosstermTerminal {
    fn next_key(&mut self, timeout: Duration) -> AppResult<Option<(Key, Instant)>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(ev) => Ok(map_key(ev).map(|k| (k, Instant::now()))),
            _ => Ok(None),
        }
    }

    fn print(&mut self, text: &str) -> AppResult<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(text.replace('\n', "\r\n"))
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn status_line(&mut self, text: &str) -> AppResult<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(text)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// A key seen by a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKey {
    /// A single key pressed on its own.
    Key(Key),
    /// A fast burst of keys ending in Enter (an RFID reader or barcode
    /// scanner), with the typed text.
    Scan(String),
}

/// Key source with one key of lookahead, so dialogs can tell a deliberate
/// key press from a reader burst. Keys read ahead are handed back on the
/// next read.
pub struct KeyReader<T> {
    term: T,
    gap: Duration,
    pending: Option<(Key, Instant)>,
}

impl<T: Terminal> KeyReader<T> {
    pub fn new(term: T, gap: Duration) -> Self {
        Self {
            term,
            gap,
            pending: None,
        }
    }

    pub fn into_inner(self) -> T {
        self.term
    }

    /// Next dialog key. A key followed within `gap` by another one starts a
    /// burst, which is read up to its Enter and returned as `Scan`. A burst
    /// that stops without Enter is dropped.
    pub fn dialog_key(&mut self, tick: Duration) -> AppResult<Option<DialogKey>> {
        let Some((key, at)) = self.next_key(tick)? else {
            return Ok(None);
        };

        let (mut next, mut last) = match self.term.next_key(self.gap)? {
            None => return Ok(Some(DialogKey::Key(key))),
            Some((next, next_at)) if next_at.saturating_duration_since(at) > self.gap => {
                self.pending = Some((next, next_at));
                return Ok(Some(DialogKey::Key(key)));
            }
            Some(burst) => burst,
        };

        let mut text = String::new();
        if let Key::Char(c) = key {
            text.push(c);
        }
        loop {
            match next {
                Key::Char(c) => text.push(c),
                Key::Enter => {
                    debug!(scan = %text, "key burst while a dialog is open");
                    return Ok(Some(DialogKey::Scan(text)));
                }
                _ => {}
            }
            match self.term.next_key(self.gap)? {
                Some((k, t)) if t.saturating_duration_since(last) <= self.gap => {
                    next = k;
                    last = t;
                }
                Some(later) => {
                    self.pending = Some(later);
                    break;
                }
                None => break,
            }
        }

        debug!(partial = %text, "dropped unfinished key burst");
        Ok(None)
    }
}

impl<T: Terminal> Terminal for KeyReader<T> {
    fn next_key(&mut self, timeout: Duration) -> AppResult<Option<(Key, Instant)>> {
        match self.pending.take() {
            Some(k) => Ok(Some(k)),
            None => self.term.next_key(timeout),
        }
    }

    fn print(&mut self, text: &str) -> AppResult<()> {
        self.term.print(text)
    }

    fn status_line(&mut self, text: &str) -> AppResult<()> {
        self.term.status_line(text)
    }
}

/// Read a line of text. Returns `None` when the operator presses Esc.
pub fn read_line<T>(term: &mut T, prompt: &str, tick: Duration) -> AppResult<Option<String>>
where
    T: Terminal + ?Sized,
{
    let mut buf = String::new();
    term.status_line(&format!("{prompt}{buf}"))?;
    loop {
        let Some((key, _)) = term.next_key(tick)? else {
            continue;
        };
        match key {
            Key::Char(c) => buf.push(c),
            Key::Backspace => {
                buf.pop();
            }
            Key::Enter => {
                term.print("\n")?;
                return Ok(Some(buf));
            }
            Key::Esc | Key::Interrupt => {
                term.print("\n")?;
                return Ok(None);
            }
            _ => continue,
        }
        term.status_line(&format!("{prompt}{buf}"))?;
    }
}

/// Wait for an explicit y/n. Esc counts as no. Enter and scans never answer,
/// since every reader burst ends in Enter.
pub fn read_yes_no<T: Terminal>(keys: &mut KeyReader<T>, tick: Duration) -> AppResult<bool> {
    loop {
        match keys.dialog_key(tick)? {
            Some(DialogKey::Key(Key::Char('y' | 'Y'))) => return Ok(true),
            Some(DialogKey::Key(Key::Char('n' | 'N') | Key::Esc | Key::Interrupt)) => {
                return Ok(false);
            }
            Some(DialogKey::Scan(_)) => {
                keys.print(&format!("{YELLOW}Scan ignored. Press y or n to answer.{RESET}\n"))?;
            }
            _ => {}
        }
    }
}

/// Block until the operator acknowledges a dialog. A scan also dismisses it
/// and is returned so the caller can submit it.
pub fn wait_ack<T: Terminal>(keys: &mut KeyReader<T>, tick: Duration) -> AppResult<Option<String>> {
    loop {
        match keys.dialog_key(tick)? {
            Some(DialogKey::Scan(text)) if !text.trim().is_empty() => return Ok(Some(text)),
            Some(DialogKey::Key(Key::Enter | Key::Esc | Key::Interrupt | Key::Char(' '))) => {
                return Ok(None);
            }
            _ => {}
        }
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedTerminal;
    use super::*;

    const TICK: Duration = Duration::from_millis(200);

    #[test]
    fn read_line_supports_backspace_and_escape() {
        let mut t = ScriptedTerminal::new()
            .key(Key::Char('3'), 0)
            .key(Key::Char('x'), 10)
            .idle()
            .key(Key::Backspace, 20)
            .key(Key::Enter, 30);
        assert_eq!(read_line(&mut t, "> ", TICK).unwrap(), Some("3".into()));

        let mut t = ScriptedTerminal::new().key(Key::Char('1'), 0).key(Key::Esc, 10);
        assert_eq!(read_line(&mut t, "> ", TICK).unwrap(), None);
    }

    const GAP: Duration = Duration::from_millis(250);

    #[test]
    fn yes_no_needs_an_explicit_answer() {
        let t = ScriptedTerminal::new()
            .key(Key::Char('q'), 0)
            .key(Key::Enter, 1000)
            .key(Key::Char('n'), 2000)
            .idle();
        let mut keys = KeyReader::new(t, GAP);
        assert!(!read_yes_no(&mut keys, TICK).unwrap());

        let t = ScriptedTerminal::new().key(Key::Char('y'), 0).idle();
        let mut keys = KeyReader::new(t, GAP);
        assert!(read_yes_no(&mut keys, TICK).unwrap());
    }

    #[test]
    fn scan_during_confirmation_is_not_an_answer() {
        let t = ScriptedTerminal::new()
            .scan("0002223334", 0)
            .key(Key::Char('n'), 1000)
            .idle();
        let mut keys = KeyReader::new(t, GAP);
        assert!(!read_yes_no(&mut keys, TICK).unwrap());
        assert!(keys.into_inner().output.contains("Scan ignored"));
    }

    #[test]
    fn scan_dismisses_acknowledgement_and_is_returned() {
        let t = ScriptedTerminal::new().scan("0002223334", 0);
        let mut keys = KeyReader::new(t, GAP);
        assert_eq!(wait_ack(&mut keys, TICK).unwrap(), Some("0002223334".into()));

        let t = ScriptedTerminal::new()
            .key(Key::Enter, 0)
            .key(Key::Esc, 1000);
        let mut keys = KeyReader::new(t, GAP);
        assert_eq!(wait_ack(&mut keys, TICK).unwrap(), None);
        // the key read ahead is not lost
        assert_eq!(keys.next_key(TICK).unwrap().map(|(k, _)| k), Some(Key::Esc));
    }

    #[test]
    fn unfinished_burst_is_dropped() {
        let t = ScriptedTerminal::new()
            .key(Key::Char('1'), 0)
            .key(Key::Char('2'), 10)
            .idle()
            .key(Key::Char(' '), 2000)
            .idle();
        let mut keys = KeyReader::new(t, GAP);
        assert_eq!(keys.dialog_key(TICK).unwrap(), None);
        assert_eq!(
            keys.dialog_key(TICK).unwrap(),
            Some(DialogKey::Key(Key::Char(' ')))
        );
    }
}
