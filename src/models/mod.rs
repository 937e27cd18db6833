pub mod attendance;
pub mod direction;
pub mod input_mode;
pub mod rfid;
pub mod student;
pub mod year_level;
