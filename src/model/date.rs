//! The calendar timestamp of a transaction.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated transaction timestamp.
///
/// Accepts RFC 3339 (`2024-01-15T00:00:00Z`, `2024-01-15T08:30:00-07:00`) or a bare calendar date
/// (`2024-01-15`, read as midnight UTC). The calendar fields are those of the timestamp as
/// written; no conversion to the local time zone takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxnDate(DateTime<FixedOffset>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid date, expected RFC 3339 or YYYY-MM-DD")]
pub struct DateError(String);

impl TxnDate {
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Short US form, e.g. `Jan 15, 2024`.
    pub fn to_short_string(&self) -> String {
        self.0.format("%b %-d, %Y").to_string()
    }
}

impl FromStr for TxnDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(timestamp));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Self(midnight.and_utc().fixed_offset()))
            .ok_or_else(|| DateError(s.to_string()))
    }
}

impl fmt::Display for TxnDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl Serialize for TxnDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxnDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TxnDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}
