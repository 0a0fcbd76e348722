//! Error type of the holiday engine.

use thiserror::Error;

use crate::time::daterule::daterule::DateRuleError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HolidayError {
    /// The requested year is outside the supported range.
    #[error("year {year} is not supported")]
    InvalidYear {
        year: i32
    },

    /// A rule has no date in the requested year (malformed fixed date,
    /// missing fifth occurrence, anchor outside its range).
    #[error("holiday '{key}' has no date in {year}: {reason}")]
    NoSuchDate {
        key: String,
        year: i32,
        reason: String
    },

    #[error("invalid rule for holiday '{key}': {reason}")]
    InvalidRule {
        key: String,
        reason: String
    },

    #[error("holiday '{key}' has no names")]
    MissingNames {
        key: String
    },

    #[error("holiday '{key}' is already present")]
    DuplicateKey {
        key: String
    },

    #[error("unknown locale '{locale}'")]
    UnknownLocale {
        locale: String
    },

    #[error("invalid substitution rule: {reason}")]
    InvalidSubstitution {
        reason: String
    }
}

impl HolidayError {
    /// Attaches the holiday key to an error raised by a date rule.
    pub fn from_date_rule(key: &str, error: DateRuleError) -> HolidayError {
        match error {
            DateRuleError::NoSuchDate { year, reason } => HolidayError::NoSuchDate {
                key: key.to_owned(),
                year,
                reason
            },
            DateRuleError::InvalidRule { reason } => HolidayError::InvalidRule {
                key: key.to_owned(),
                reason
            }
        }
    }
}

pub type HolidayResult<T> = Result<T, HolidayError>;
