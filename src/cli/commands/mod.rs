pub mod config;
pub mod export;
pub mod init;
pub mod kiosk;
pub mod link;
pub mod list;
pub mod log;
pub mod record;
pub mod student;
