use serde::Deserialize;

use super::student::string_or_number;

/// Pairs a scanned RFID tag with a student identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RfidLink {
    #[serde(deserialize_with = "string_or_number")]
    pub rfid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub student_id: String,
}
