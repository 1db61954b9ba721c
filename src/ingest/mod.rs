//! Parsing of vendor history payloads into typed fragments.
//!
//! The monitoring API hands collaborators raw JSON per source unit; this
//! module turns those units into index-aligned fragments the merge step can
//! consume. No file discovery or caching lives here — callers name every
//! payload explicitly.

use chrono::NaiveDateTime;

use crate::error::HistoryError;

/// Power parsing for `powerDetails` source units.
pub mod power;
/// Battery telemetry parsing for `storageData` source units.
pub mod storage;

pub use power::PowerFragment;
pub use storage::parse_storage_data;

/// Timestamp format used by every vendor payload.
///
/// Kept as a documented literal; the format is fixed by the API and is
/// never inferred from the data.
pub const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses one payload timestamp string.
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, HistoryError> {
    NaiveDateTime::parse_from_str(raw, API_TIME_FORMAT).map_err(|_| HistoryError::Timestamp {
        value: raw.to_string(),
        format: API_TIME_FORMAT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_the_documented_format() {
        let parsed = parse_timestamp("2022-03-05 14:30:00");
        let want = NaiveDate::from_ymd_opt(2022, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parsed.ok(), Some(want));
    }

    #[test]
    fn rejects_other_formats() {
        assert!(parse_timestamp("2022-03-05T14:30:00").is_err());
        assert!(parse_timestamp("05/03/2022 14:30").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
