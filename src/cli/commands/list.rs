use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceEvent, AttendanceFilter};
use crate::models::direction::Direction;
use crate::store;
use crate::utils::colors::colorize_direction;
use crate::utils::date::parse_date;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        student,
        date,
        kind,
    } = cmd
    {
        let filter = build_filter(student, date, *kind)?;
        let store = store::open(cfg)?;
        let events = store.list_attendance(&filter)?;

        if events.is_empty() {
            println!("No attendance events found.");
            return Ok(());
        }

        print!("{}", render(&events));
        println!("\n{} event(s)", events.len());
    }
    Ok(())
}

/// Shared by `list` and `export`.
pub(crate) fn build_filter(
    student: &Option<String>,
    date: &Option<String>,
    direction: Option<Direction>,
) -> AppResult<AttendanceFilter> {
    Ok(AttendanceFilter {
        student_id: student
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        date: date.as_deref().map(parse_date).transpose()?,
        direction,
    })
}

fn render(events: &[AttendanceEvent]) -> String {
    let mut table = Table::new(vec![
        Column::new("Student ID"),
        Column::new("Date"),
        Column::new("Time"),
        Column::new("Type"),
    ]);

    for ev in events {
        let kind = ev.attendance_type;
        table.add_row(vec![
            ev.student_id.clone(),
            ev.date().to_string(),
            ev.time_str(),
            colorize_direction(kind.to_db_str(), kind.is_in()),
        ]);
    }

    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn filter_ignores_blank_student_and_parses_date() {
        let f = build_filter(&Some("  ".into()), &Some("2025-10-19".into()), None).unwrap();
        assert!(f.student_id.is_none());
        assert_eq!(f.date.unwrap().to_string(), "2025-10-19");
        assert!(build_filter(&None, &Some("yesterday".into()), None).is_err());
    }

    #[test]
    fn rows_show_date_time_and_type() {
        let ev = AttendanceEvent {
            student_id: "2021-0001".into(),
            attendance_type: Direction::Out,
            created_at: Local.with_ymd_and_hms(2025, 10, 19, 7, 30, 5).unwrap(),
        };
        let out = render(&[ev]);
        assert!(out.starts_with("Student ID"));
        assert!(out.contains("2021-0001"));
        assert!(out.contains("2025-10-19"));
        assert!(out.contains("07:30:05"));
        assert!(out.contains("OUT"));
    }
}
