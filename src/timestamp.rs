//! `minutes:seconds` timestamps.
//!
//! The insights service reports every appearance and transcript instance as
//! a `M:SS` string (occasionally unpadded, `M:S`). This module parses those
//! strings into elapsed seconds for seeking and subtitle sync, and renders
//! them back for display.
//!
//! # Example
//!
//! ```
//! use vidsift::{Timestamp, format_timestamp};
//!
//! let timestamp: Timestamp = "1:05".parse()?;
//! assert_eq!(timestamp.as_seconds(), 65.0);
//! assert_eq!(format_timestamp("5:7")?, "5:07");
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::VidsiftError;

/// A parsed `minutes:seconds` position.
///
/// An `H:MM:SS` string is also accepted; its hours are folded into
/// [`minutes`](Timestamp::minutes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp {
    /// Whole minutes. Not bounded to 59.
    pub minutes: u64,
    /// Seconds within the minute. May be fractional.
    pub seconds: f64,
}

impl Timestamp {
    /// Create a timestamp from its components.
    pub fn new(minutes: u64, seconds: f64) -> Self {
        Self { minutes, seconds }
    }

    /// Total elapsed seconds, `minutes * 60 + seconds`.
    pub fn as_seconds(&self) -> f64 {
        self.minutes as f64 * 60.0 + self.seconds
    }
}

impl FromStr for Timestamp {
    type Err = VidsiftError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();

        let (hours, minutes, seconds) = match parts.as_slice() {
            [minutes, seconds] => (None, *minutes, *seconds),
            [hours, minutes, seconds] => (Some(*hours), *minutes, *seconds),
            _ => {
                return Err(VidsiftError::malformed_timestamp(
                    value,
                    "expected minutes:seconds",
                ));
            }
        };

        let hours = match hours {
            Some(hours) => parse_whole(value, hours, "hours")?,
            None => 0,
        };
        let minutes = parse_whole(value, minutes, "minutes")?;

        let seconds: f64 = seconds.parse().map_err(|_| {
            VidsiftError::malformed_timestamp(value, format!("invalid seconds {seconds:?}"))
        })?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(VidsiftError::malformed_timestamp(
                value,
                "seconds must be a non-negative number",
            ));
        }

        Ok(Timestamp::new(hours * 60 + minutes, seconds))
    }
}

/// Renders as `minutes:seconds`, seconds padded to two characters.
impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let seconds = self.seconds.to_string();
        write!(f, "{}:{:0>2}", self.minutes, seconds)
    }
}

fn parse_whole(value: &str, component: &str, label: &str) -> Result<u64, VidsiftError> {
    component.parse::<u64>().map_err(|_| {
        VidsiftError::malformed_timestamp(value, format!("invalid {label} {component:?}"))
    })
}

/// Parse a `minutes:seconds` string into elapsed seconds.
///
/// # Errors
///
/// [`VidsiftError::MalformedTimestamp`] if any component is not numeric.
pub fn parse_seconds(value: &str) -> Result<f64, VidsiftError> {
    value.parse::<Timestamp>().map(|timestamp| timestamp.as_seconds())
}

/// Reformat a `minutes:seconds` string for display.
///
/// Minutes are left unpadded; seconds are zero-padded to width 2, so
/// `"5:7"` becomes `"5:07"` and `"12:34"` is unchanged.
///
/// # Errors
///
/// [`VidsiftError::MalformedTimestamp`] if the input does not parse.
pub fn format_timestamp(value: &str) -> Result<String, VidsiftError> {
    value.parse::<Timestamp>().map(|timestamp| timestamp.to_string())
}
