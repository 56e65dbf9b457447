//! Utility functions and helpers.

pub mod http;

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Output filename for a run started at `now`: `YYYYMMDDHHMMSS.json`.
pub fn generate_filename<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}.json", now.format("%Y%m%d%H%M%S"))
}

/// Object key for an output document.
///
/// Partitioned documents land under `{partition}/`, everything else at
/// the bucket root.
pub fn object_key(partition: Option<&str>, filename: &str) -> String {
    match partition {
        Some(partition) if !partition.is_empty() => format!("{partition}/{filename}"),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_generate_filename_utc() {
        let now = Utc.timestamp_opt(1_555_555_555, 555_555_000).unwrap();
        assert_eq!(generate_filename(&now), "20190418024555.json");
    }

    #[test]
    fn test_generate_filename_uses_given_offset() {
        let pacific = FixedOffset::west_opt(7 * 3600).unwrap();
        let now = pacific.timestamp_opt(1_555_555_555, 0).unwrap();
        assert_eq!(generate_filename(&now), "20190417194555.json");
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            object_key(Some("202001"), "20190418024555.json"),
            "202001/20190418024555.json"
        );
        assert_eq!(object_key(None, "20190418024555.json"), "20190418024555.json");
        assert_eq!(object_key(Some(""), "a.json"), "a.json");
    }
}
