//! PostgREST (Supabase) backed store.
//!
//! Tables: `Students(student_id, name, year)`, `RfidToStudent(rfid, student_id)`
//! and `Attendance(student_id, attendance_type, created_at)`.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::{Config, ENV_REMOTE_KEY, ENV_REMOTE_URL};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, AttendanceFilter};
use crate::models::direction::Direction;
use crate::models::rfid::RfidLink;
use crate::models::student::Student;
use crate::models::year_level::YearLevel;
use crate::store::AttendanceStore;

const STUDENTS: &str = "Students";
const RFID_TO_STUDENT: &str = "RfidToStudent";
const ATTENDANCE: &str = "Attendance";

const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";

/// Rows per request when reading attendance. PostgREST caps responses at
/// `max-rows` (1000 on Supabase), so reads page until a short page.
const PAGE_SIZE: usize = 1000;

/// Error body returned by PostgREST on non-2xx responses.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

pub struct RemoteStore {
    base: Url,
    http: Client,
    page_size: usize,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        if base_url.trim().is_empty() {
            return Err(AppError::Config(format!(
                "remote backend needs remote_url (or {ENV_REMOTE_URL})"
            )));
        }
        if api_key.trim().is_empty() {
            return Err(AppError::Config(format!(
                "remote backend needs remote_key (or {ENV_REMOTE_KEY})"
            )));
        }

        let base = rest_base(base_url)?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key.trim())
            .map_err(|e| AppError::Config(format!("invalid remote_key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| AppError::Config(format!("invalid remote_key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(concat!("rattendance/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base,
            http,
            page_size: PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::new(
            &cfg.remote_url,
            &cfg.remote_key,
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    fn table_url(&self, table: &str, query: &[(&str, String)]) -> AppResult<Url> {
        table_url(&self.base, table, query)
    }

    fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> AppResult<Vec<T>> {
        let url = self.table_url(table, query)?;
        debug!(%url, "select");
        let resp = self.http.get(url).send()?;
        Ok(check(resp)?.json()?)
    }

    fn send(&self, req: RequestBuilder) -> AppResult<Response> {
        check(req.send()?)
    }
}

/// `https://x.supabase.co` → `https://x.supabase.co/rest/v1/`
fn rest_base(base_url: &str) -> AppResult<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let with_rest = if trimmed.ends_with("/rest/v1") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/rest/v1/")
    };
    Url::parse(&with_rest).map_err(|e| AppError::Config(format!("invalid remote_url: {e}")))
}

fn table_url(base: &Url, table: &str, query: &[(&str, String)]) -> AppResult<Url> {
    let mut url = base
        .join(table)
        .map_err(|e| AppError::Other(format!("cannot build URL for {table}: {e}")))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn check(resp: Response) -> AppResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = body_or_reason(status, resp.text());
    Err(decode_error(status.as_u16(), &body))
}

/// The error body, or the status reason when it is empty or unreadable.
fn body_or_reason<E: fmt::Display>(status: StatusCode, body: Result<String, E>) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    match body {
        Ok(b) if !b.trim().is_empty() => b,
        Ok(_) => reason.to_string(),
        Err(e) => {
            warn!(%status, error = %e, "could not read error body");
            reason.to_string()
        }
    }
}

/// Local midnight of `day`, and of the day after.
fn day_bounds(day: NaiveDate) -> AppResult<(DateTime<Local>, DateTime<Local>)> {
    let midnight = |d: NaiveDate| {
        Local
            .from_local_datetime(&d.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| AppError::InvalidDate(d.to_string()))
    };
    let next = day
        .succ_opt()
        .ok_or_else(|| AppError::InvalidDate(day.to_string()))?;
    Ok((midnight(day)?, midnight(next)?))
}

/// Query for one page of attendance rows. Every filter runs server side.
fn attendance_query(
    filter: &AttendanceFilter,
    limit: usize,
    offset: usize,
) -> AppResult<Vec<(&'static str, String)>> {
    let mut query = vec![
        ("select", "student_id,attendance_type,created_at".to_string()),
        ("order", "created_at.asc".to_string()),
    ];
    if let Some(id) = &filter.student_id {
        query.push(("student_id", eq(id)));
    }
    if let Some(d) = filter.direction {
        query.push(("attendance_type", eq(d.to_db_str())));
    }
    if let Some(day) = filter.date {
        let (start, end) = day_bounds(day)?;
        query.push(("created_at", format!("gte.{}", start.to_rfc3339())));
        query.push(("created_at", format!("lt.{}", end.to_rfc3339())));
    }
    query.push(("limit", limit.to_string()));
    query.push(("offset", offset.to_string()));
    Ok(query)
}

/// Turn a PostgREST error body into `AppError::Remote`, keeping the
/// provider's code and message verbatim.
fn decode_error(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) if err.code.is_some() || err.message.is_some() => {
            let mut message = err.message.unwrap_or_default();
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message.push_str(&format!(" ({details})"));
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                message.push_str(&format!(" [hint: {hint}]"));
            }
            AppError::Remote {
                code: err.code.unwrap_or_else(|| status.to_string()),
                message,
            }
        }
        _ => AppError::Remote {
            code: status.to_string(),
            message: body.trim().to_string(),
        },
    }
}

impl AttendanceStore for RemoteStore {
    fn find_student(&self, student_id: &str) -> AppResult<Option<Student>> {
        let rows: Vec<Student> = self.select(
            STUDENTS,
            &[
                ("select", "student_id,name,year".into()),
                ("student_id", eq(student_id)),
            ],
        )?;
        Ok(rows.into_iter().next())
    }

    fn find_rfid(&self, rfid: &str) -> AppResult<Option<RfidLink>> {
        let rows: Vec<RfidLink> = self.select(
            RFID_TO_STUDENT,
            &[("select", "student_id,rfid".into()), ("rfid", eq(rfid))],
        )?;
        Ok(rows.into_iter().next())
    }

    fn update_student_year(&mut self, student_id: &str, year: YearLevel) -> AppResult<()> {
        let url = self.table_url(STUDENTS, &[("student_id", eq(student_id))])?;
        debug!(%url, %year, "update year");
        self.send(
            self.http
                .patch(url)
                .header("Prefer", PREFER_MINIMAL)
                .json(&json!({ "year": year.get() })),
        )?;
        Ok(())
    }

    fn insert_attendance(
        &mut self,
        student_id: &str,
        direction: Direction,
    ) -> AppResult<AttendanceEvent> {
        let url = self.table_url(ATTENDANCE, &[])?;
        debug!(%url, student_id, %direction, "insert attendance");
        // insert-only row level security allows no read back, so the
        // server timestamp is not requested
        self.send(
            self.http
                .post(url)
                .header("Prefer", PREFER_MINIMAL)
                .json(&json!({
                    "student_id": student_id,
                    "attendance_type": direction.to_db_str(),
                })),
        )?;
        Ok(AttendanceEvent {
            student_id: student_id.to_string(),
            attendance_type: direction,
            created_at: Local::now(),
        })
    }

    fn link_rfid(&mut self, rfid: &str, student_id: &str) -> AppResult<()> {
        let url = self.table_url(RFID_TO_STUDENT, &[("on_conflict", "rfid".into())])?;
        self.send(
            self.http
                .post(url)
                .header("Prefer", PREFER_UPSERT)
                .json(&json!({ "rfid": rfid, "student_id": student_id })),
        )?;
        Ok(())
    }

    fn upsert_student(&mut self, student: &Student) -> AppResult<()> {
        let url = self.table_url(STUDENTS, &[("on_conflict", "student_id".into())])?;
        self.send(
            self.http
                .post(url)
                .header("Prefer", PREFER_UPSERT)
                .json(student),
        )?;
        Ok(())
    }

    fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEvent>> {
        let mut out = Vec::new();
        let mut offset = 0;
        loop {
            let query = attendance_query(filter, self.page_size, offset)?;
            let page: Vec<AttendanceEvent> = self.select(ATTENDANCE, &query)?;
            let n = page.len();
            out.extend(page.into_iter().filter(|ev| filter.matches(ev)));
            if n < self.page_size {
                break;
            }
            offset += n;
        }
        Ok(out)
    }
}
