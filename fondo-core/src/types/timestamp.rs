//! Unix millisecond timestamps.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Milliseconds since the Unix epoch, never negative.
///
/// Ledger listings sort on this value, newest first.
///
/// # Examples
///
/// ```
/// use fondo_core::types::Timestamp;
///
/// let ts = Timestamp::new(1_704_067_200_000).unwrap();
/// assert!(Timestamp::now() > ts);
/// assert!(Timestamp::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "i64", into = "i64")]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from Unix milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidTimestamp` if the value is negative.
    pub fn new(millis: i64) -> Result<Self, ValidationError> {
        if millis < 0 {
            return Err(ValidationError::InvalidTimestamp(millis));
        }
        Ok(Self(millis))
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis().max(0))
    }

    /// Returns the Unix milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = ValidationError;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Self::new(millis)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_new_negative() {
        let result = Timestamp::new(-1);
        assert!(matches!(result, Err(ValidationError::InvalidTimestamp(-1))));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let parsed: Result<Timestamp, _> = serde_json::from_str("-5");
        assert!(parsed.is_err());

        let parsed: Timestamp = serde_json::from_str("1704067200000").unwrap();
        assert_eq!(parsed.as_millis(), 1_704_067_200_000);
    }
}
