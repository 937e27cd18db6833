pub mod dialog;
pub mod messages;
