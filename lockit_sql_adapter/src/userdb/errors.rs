use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

/// The key a missing user was looked up by
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserKey {
    Name(String),
    Id(i64),
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "\"{name}\""),
            Self::Id(id) => write!(f, "with id {id}"),
        }
    }
}

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("Cannot find user {0}")]
    NotFound(UserKey),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for UserError {
    fn from(err: serde_json::Error) -> Self {
        UserError::InvalidData(err.to_string())
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Storage(err.to_string())
    }
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Storage(msg) => UserError::Storage(msg),
            StorageError::UnsupportedUrl(_) => UserError::Config(err.to_string()),
            StorageError::InvalidTableName(_) => UserError::InvalidData(err.to_string()),
        }
    }
}

impl From<UtilError> for UserError {
    fn from(err: UtilError) -> Self {
        UserError::Config(err.to_string())
    }
}
