use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::time::holiday::holidayerror::HolidayError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error
    },

    #[error("invalid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("key '{0}' not found")]
    NameNotFound(String),

    #[error("key '{0}' defined more than once")]
    DuplicateName(String),

    #[error("jurisdiction '{name}' refers to unknown or cyclic parent '{parent}'")]
    UnresolvedParent { name: String, parent: String },

    #[error("jurisdiction '{name}' has invalid timezone: {message}")]
    InvalidTimezone { name: String, message: String },

    #[error("jurisdiction '{name}' has no timezone and no parent to inherit one from")]
    MissingTimezone { name: String },

    #[error(transparent)]
    Holiday(#[from] HolidayError)
}

pub fn parse_json_value<T: DeserializeOwned>(json_value: serde_json::Value) -> Result<T, ManagerError> {
    serde_json::from_value(json_value).map_err(ManagerError::JsonParse)
}
