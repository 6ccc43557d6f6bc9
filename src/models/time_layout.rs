//! Time frames and layouts

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{DwmlError, Result};

/// Layout key to frames, index-aligned with the values that reference it
pub type TimeLayouts = BTreeMap<String, Vec<TimeFrame>>;

/// One start/end interval of a time layout
///
/// Both bounds are kept exactly as the document wrote them, offset included.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeFrame {
    #[serde(rename = "start-time")]
    pub start: String,
    #[serde(rename = "end-time")]
    pub end: String,
}

impl TimeFrame {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parsed start bound
    pub fn start_time(&self) -> Result<DateTime<FixedOffset>> {
        parse_timestamp(&self.start)
    }

    /// Parsed end bound
    pub fn end_time(&self) -> Result<DateTime<FixedOffset>> {
        parse_timestamp(&self.end)
    }

    /// Length of the frame
    pub fn duration(&self) -> Result<Duration> {
        Ok(self.end_time()? - self.start_time()?)
    }
}

/// Parse an RFC 3339 timestamp, keeping its UTC offset
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|source| DwmlError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let frame = TimeFrame::new("2015-06-27T14:00:00-04:00", "2015-06-27T20:00:00-04:00");
        assert_eq!(frame.duration().unwrap(), Duration::hours(6));
        assert_eq!(frame.start_time().unwrap().offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_invalid_timestamp() {
        let frame = TimeFrame::new("yesterday", "2015-06-27T20:00:00-04:00");
        assert!(matches!(
            frame.start_time(),
            Err(DwmlError::InvalidTimestamp { .. })
        ));
        assert!(frame.duration().is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let frame = TimeFrame::new("2015-06-27T14:00:00-04:00", "2015-06-27T20:00:00-04:00");
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["start-time"], "2015-06-27T14:00:00-04:00");
        assert_eq!(json["end-time"], "2015-06-27T20:00:00-04:00");
    }
}
