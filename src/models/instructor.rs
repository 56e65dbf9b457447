//! Instructor profile data structures.

use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned by the rating site.
///
/// The search index returns it as a number, older documents stored it as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ExternalId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Numeric(id) => write!(f, "{id}"),
            ExternalId::Text(id) => f.write_str(id),
        }
    }
}

// Decoded through `Value` so arbitrary-precision numbers are understood.
impl<'de> Deserialize<'de> for ExternalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(id) => id
                .as_u64()
                .map(ExternalId::Numeric)
                .ok_or_else(|| D::Error::custom(format!("id {id} is not an unsigned integer"))),
            Value::String(id) => Ok(ExternalId::Text(id)),
            other => Err(D::Error::custom(format!(
                "expected a number or string id, found {other}"
            ))),
        }
    }
}

/// First-ranked match returned by the rating source.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub first_name: String,
    pub last_name: String,
    /// `None` until the instructor has received ratings
    pub rating: Option<f64>,
    pub id: ExternalId,
}

/// Instructor with rating data attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedInstructor {
    /// Name exactly as it appeared in the schedule
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub rating: Option<f64>,
    pub rmp_id: ExternalId,
}

/// Instructor the rating source knows nothing about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnratedInstructor {
    pub full_name: String,
}

/// Replacement for a course's plain instructor name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InstructorProfile {
    Rated(RatedInstructor),
    Unrated(UnratedInstructor),
}

impl InstructorProfile {
    /// Build a rated profile keyed by the original schedule name.
    pub fn rated(full_name: impl Into<String>, record: RatingRecord) -> Self {
        Self::Rated(RatedInstructor {
            full_name: full_name.into(),
            first_name: record.first_name,
            last_name: record.last_name,
            rating: record.rating,
            rmp_id: record.id,
        })
    }

    /// Build the bare `{fullName}` fallback.
    pub fn unrated(full_name: impl Into<String>) -> Self {
        Self::Unrated(UnratedInstructor {
            full_name: full_name.into(),
        })
    }

    pub fn full_name(&self) -> &str {
        match self {
            Self::Rated(rated) => &rated.full_name,
            Self::Unrated(unrated) => &unrated.full_name,
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self, Self::Rated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jane() -> RatingRecord {
        RatingRecord {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            rating: Some(4.0),
            id: ExternalId::Numeric(12345),
        }
    }

    #[test]
    fn test_rated_profile_wire_shape() {
        let profile = InstructorProfile::rated("Jane Doe", jane());
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({
                "fullName": "Jane Doe",
                "firstName": "Jane",
                "lastName": "Doe",
                "rating": 4.0,
                "rmpId": 12345,
            })
        );
    }

    #[test]
    fn test_missing_rating_serializes_as_null() {
        let record = RatingRecord {
            rating: None,
            ..jane()
        };
        let value = serde_json::to_value(InstructorProfile::rated("Jane Doe", record)).unwrap();
        assert_eq!(value["rating"], serde_json::Value::Null);
    }

    #[test]
    fn test_unrated_profile_wire_shape() {
        let profile = InstructorProfile::unrated("Unknown Person");
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"fullName": "Unknown Person"})
        );
        assert!(!profile.is_rated());
    }

    #[test]
    fn test_external_id_accepts_number_or_text() {
        let numeric: ExternalId = serde_json::from_str("58011").unwrap();
        assert_eq!(numeric, ExternalId::Numeric(58011));

        let text: ExternalId = serde_json::from_str(r#""abc-1""#).unwrap();
        assert_eq!(text, ExternalId::Text("abc-1".to_string()));

        assert!(serde_json::from_str::<ExternalId>("-3").is_err());
        assert!(serde_json::from_str::<ExternalId>("[1]").is_err());
    }
}
