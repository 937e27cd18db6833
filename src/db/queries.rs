use chrono::{DateTime, Local};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, AttendanceFilter};
use crate::models::direction::Direction;
use crate::models::rfid::RfidLink;
use crate::models::student::Student;
use crate::models::year_level::YearLevel;

fn map_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        student_id: row.get("student_id")?,
        name: row.get("name")?,
        year: row.get("year")?,
    })
}

fn map_attendance(row: &Row) -> rusqlite::Result<AttendanceEvent> {
    let kind: String = row.get("attendance_type")?;
    let attendance_type = Direction::from_db_str(&kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::InvalidDirection(kind.clone())),
        )
    })?;

    let raw: String = row.get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                Box::new(AppError::InvalidDate(raw.clone())),
            )
        })?;

    Ok(AttendanceEvent {
        student_id: row.get("student_id")?,
        attendance_type,
        created_at,
    })
}

pub fn find_student(conn: &Connection, student_id: &str) -> AppResult<Option<Student>> {
    let mut stmt = conn.prepare_cached(
        "SELECT student_id, name, year FROM students WHERE student_id = ?1",
    )?;
    Ok(stmt.query_row([student_id], map_student).optional()?)
}

pub fn upsert_student(conn: &Connection, student: &Student) -> AppResult<()> {
    conn.execute(
        "INSERT INTO students (student_id, name, year) VALUES (?1, ?2, ?3)
         ON CONFLICT(student_id) DO UPDATE SET name = excluded.name, year = excluded.year",
        params![student.student_id, student.name, student.year],
    )?;
    Ok(())
}

/// Returns the number of rows touched (0 when the student does not exist).
pub fn update_student_year(conn: &Connection, student_id: &str, year: YearLevel) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE students SET year = ?1 WHERE student_id = ?2",
        params![year.get(), student_id],
    )?;
    Ok(n)
}

pub fn find_rfid(conn: &Connection, rfid: &str) -> AppResult<Option<RfidLink>> {
    let mut stmt =
        conn.prepare_cached("SELECT rfid, student_id FROM rfid_links WHERE rfid = ?1")?;
    let link = stmt
        .query_row([rfid], |row| {
            Ok(RfidLink {
                rfid: row.get(0)?,
                student_id: row.get(1)?,
            })
        })
        .optional()?;
    Ok(link)
}

/// A tag maps to exactly one student; relinking replaces the previous owner.
pub fn link_rfid(conn: &Connection, rfid: &str, student_id: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO rfid_links (rfid, student_id) VALUES (?1, ?2)
         ON CONFLICT(rfid) DO UPDATE SET student_id = excluded.student_id",
        params![rfid, student_id],
    )?;
    Ok(())
}

pub fn insert_attendance(
    conn: &Connection,
    student_id: &str,
    direction: Direction,
) -> AppResult<AttendanceEvent> {
    let created_at = Local::now();
    conn.execute(
        "INSERT INTO attendance (student_id, attendance_type, created_at)
         VALUES (?1, ?2, ?3)",
        params![student_id, direction.to_db_str(), created_at.to_rfc3339()],
    )?;
    Ok(AttendanceEvent {
        student_id: student_id.to_string(),
        attendance_type: direction,
        created_at,
    })
}

pub fn list_attendance(
    conn: &Connection,
    filter: &AttendanceFilter,
) -> AppResult<Vec<AttendanceEvent>> {
    let mut sql = String::from(
        "SELECT student_id, attendance_type, created_at FROM attendance WHERE 1 = 1",
    );
    let mut args: Vec<String> = Vec::new();

    if let Some(id) = &filter.student_id {
        args.push(id.clone());
        sql.push_str(&format!(" AND student_id = ?{}", args.len()));
    }
    if let Some(d) = filter.direction {
        args.push(d.to_db_str().to_string());
        sql.push_str(&format!(" AND attendance_type = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), map_attendance)?;

    let mut out = Vec::new();
    for r in rows {
        let ev = r?;
        // created_at carries its own offset, so the day is compared in local time
        if filter.matches(&ev) {
            out.push(ev);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn student_roundtrip_and_year_update() {
        let pool = DbPool::in_memory().unwrap();
        upsert_student(&pool.conn, &Student::new("42", "Ana Cruz", None)).unwrap();

        let s = find_student(&pool.conn, "42").unwrap().unwrap();
        assert_eq!(s.name, "Ana Cruz");
        assert!(!s.has_valid_year());

        let touched = update_student_year(&pool.conn, "42", YearLevel::new(3).unwrap()).unwrap();
        assert_eq!(touched, 1);
        assert_eq!(find_student(&pool.conn, "42").unwrap().unwrap().year, Some(3));

        assert!(find_student(&pool.conn, "nope").unwrap().is_none());
    }

    #[test]
    fn relinking_a_tag_moves_it() {
        let pool = DbPool::in_memory().unwrap();
        upsert_student(&pool.conn, &Student::new("1", "A", Some(1))).unwrap();
        upsert_student(&pool.conn, &Student::new("2", "B", Some(2))).unwrap();

        link_rfid(&pool.conn, "0004455", "1").unwrap();
        link_rfid(&pool.conn, "0004455", "2").unwrap();

        let link = find_rfid(&pool.conn, "0004455").unwrap().unwrap();
        assert_eq!(link.student_id, "2");
        assert!(find_rfid(&pool.conn, "999").unwrap().is_none());
    }

    #[test]
    fn list_filters_by_student_and_direction() {
        let pool = DbPool::in_memory().unwrap();
        upsert_student(&pool.conn, &Student::new("1", "A", Some(1))).unwrap();
        upsert_student(&pool.conn, &Student::new("2", "B", Some(2))).unwrap();
        insert_attendance(&pool.conn, "1", Direction::In).unwrap();
        insert_attendance(&pool.conn, "2", Direction::In).unwrap();
        insert_attendance(&pool.conn, "1", Direction::Out).unwrap();

        let all = list_attendance(&pool.conn, &AttendanceFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let filter = AttendanceFilter {
            student_id: Some("1".into()),
            direction: Some(Direction::Out),
            ..Default::default()
        };
        let only = list_attendance(&pool.conn, &filter).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].attendance_type, Direction::Out);
    }
}
