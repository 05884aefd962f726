//! Amount type for transaction magnitudes.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a dollar sign and commas. The sign of a transaction is carried by its
//! `TransactionType`, never by its `Amount`, so negative values are rejected.

use crate::format::format_currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A non-negative dollar amount.
///
/// # Examples
///
/// ```
/// # use txn_view::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,234.56").unwrap();
/// assert_eq!(amount.to_string(), "$1,234.56");
///
/// let bare = Amount::from_str("4.5").unwrap();
/// assert_eq!(bare.to_string(), "$4.50");
///
/// assert!(Amount::from_str("-$5.00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new `Amount`, failing if `value` is negative.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        // folds "-0.00" into "0.00"
        Ok(Self(value.abs()))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmountError {
    #[error("Unable to parse amount '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("Amount is empty")]
    Empty,

    #[error("Amount {0} is negative, the sign of a transaction comes from its type")]
    Negative(Decimal),
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // "-$50.00" keeps its minus so that it is reported as negative rather than unparseable
        let without_dollar = match trimmed.strip_prefix('-') {
            Some(after_minus) => format!("-{}", after_minus.trim_start_matches('$')),
            None => trimmed.trim_start_matches('$').to_string(),
        };
        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas).map_err(|source| AmountError::Parse {
            input: s.to_string(),
            source,
        })?;
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(self.0))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
