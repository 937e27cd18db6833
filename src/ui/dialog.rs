//! Boxed dialogs (confirmation, year prompt, error, success) drawn as text.

use unicode_width::UnicodeWidthStr;

use crate::utils::colors::{RED, RESET, YELLOW};

const MAX_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Warn,
    Error,
}

/// Render a box around `title` plus optional `body` lines, each wrapped to
/// the dialog width. The returned string ends with a newline.
pub fn render(title: &str, body: &[&str], footer: &str, tone: Tone) -> String {
    let mut lines: Vec<String> = textwrap::wrap(title, MAX_WIDTH)
        .into_iter()
        .map(|l| l.into_owned())
        .collect();

    if !body.is_empty() {
        lines.push(String::new());
        for b in body {
            lines.extend(textwrap::wrap(b, MAX_WIDTH).into_iter().map(|l| l.into_owned()));
        }
    }
    if !footer.is_empty() {
        lines.push(String::new());
        lines.push(footer.to_string());
    }

    let inner = lines
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);

    let (color, reset) = match tone {
        Tone::Plain => ("", ""),
        Tone::Warn => (YELLOW, RESET),
        Tone::Error => (RED, RESET),
    };

    let mut out = String::new();
    out.push_str(&format!("{color}┌{}┐{reset}\n", "─".repeat(inner + 2)));
    for l in &lines {
        let pad = inner - UnicodeWidthStr::width(l.as_str());
        out.push_str(&format!("{color}│{reset} {l}{} {color}│{reset}\n", " ".repeat(pad)));
    }
    out.push_str(&format!("{color}└{}┘{reset}\n", "─".repeat(inner + 2)));
    out
}

pub fn confirm_student(name: &str) -> String {
    render(&format!("Are you {name}?"), &[], "[y] Yes   [n] No", Tone::Plain)
}

pub fn year_prompt() -> String {
    render(
        "Please input your year level below. (1 / 2 / 3 / 4)",
        &[],
        "Type 1-4 and press Enter to update",
        Tone::Warn,
    )
}

pub fn error_dialog(error_log: &str) -> String {
    render(
        "An error occurred. Please check the error message below.",
        &[error_log],
        "[Enter] Ok",
        Tone::Error,
    )
}

pub fn success_dialog() -> String {
    render("Attendance recorded.", &[], "[Enter] Ok", Tone::Plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_lines_share_one_width() {
        let s = render("Are you Ana Cruz?", &["second line"], "[y] Yes", Tone::Plain);
        let widths: Vec<usize> = s.lines().map(UnicodeWidthStr::width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{s}");
        assert!(s.contains("Are you Ana Cruz?"));
    }

    #[test]
    fn long_error_payloads_wrap() {
        let payload = "PGRST301 - ".to_string() + &"x".repeat(150);
        let s = error_dialog(&payload);
        assert!(s.lines().count() > 6);
        assert!(s.contains("PGRST301"));
    }
}
