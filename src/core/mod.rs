pub mod config;
pub mod link;
pub mod log;
pub mod record;
pub mod session;
pub mod student;
