#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rat() -> Command {
    cargo_bin_cmd!("rattendance")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run a command against the local test database
pub fn on_db(db_path: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut full = vec!["--db", db_path, "--test", "--backend", "local"];
    full.extend_from_slice(args);
    rat().args(full).assert()
}

/// Initialize DB with two students, one without a year level, and one linked tag
pub fn init_db_with_students(db_path: &str) {
    on_db(db_path, &["init"]).success();
    on_db(db_path, &["student", "add", "2021-0001", "Ana Cruz", "--year", "2"]).success();
    on_db(db_path, &["student", "add", "2021-0002", "Ben Reyes"]).success();
    on_db(db_path, &["link", "0001112223", "2021-0001"]).success();
}
