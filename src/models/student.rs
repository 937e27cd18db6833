use serde::{Deserialize, Deserializer, Serialize};

use super::year_level::YearLevel;

/// A student record as held by the database.
///
/// The remote `student_id` column may be numeric or text, so it is kept as a
/// string on this side. `year` is `None` (or 0) while unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "string_or_number")]
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub year: Option<i64>,
}

impl Student {
    pub fn new(student_id: impl Into<String>, name: impl Into<String>, year: Option<i64>) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            year,
        }
    }

    pub fn year_level(&self) -> Option<YearLevel> {
        self.year.and_then(YearLevel::new)
    }

    pub fn has_valid_year(&self) -> bool {
        self.year_level().is_some()
    }
}

/// Accept `"2021-0042"` as well as `20210042` for identifier columns.
pub(crate) fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(de)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_validity() {
        assert!(Student::new("1", "Ana", Some(2)).has_valid_year());
        assert!(!Student::new("1", "Ana", Some(0)).has_valid_year());
        assert!(!Student::new("1", "Ana", Some(7)).has_valid_year());
        assert!(!Student::new("1", "Ana", None).has_valid_year());
    }

    #[test]
    fn numeric_ids_deserialize_as_strings() {
        let s: Student =
            serde_json::from_str(r#"{"student_id": 20210042, "name": "Ben", "year": null}"#)
                .unwrap();
        assert_eq!(s.student_id, "20210042");
        assert_eq!(s.year, None);
    }
}
