use std::fmt;

use thiserror::Error;

/// Input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Description,
    Category,
    Date,
    Budget,
    Currency,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Amount => "amount",
            Field::Description => "description",
            Field::Category => "category",
            Field::Date => "date",
            Field::Budget => "budget",
            Field::Currency => "currency",
        };
        f.write_str(name)
    }
}

/// Rejected user input. The message is suitable for showing to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures of the key-value persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage quota exceeded writing `{key}` ({bytes} bytes, quota {quota})")]
    QuotaExceeded {
        key: String,
        bytes: usize,
        quota: usize,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored value for `{key}` is malformed: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Error type that captures ledger failures surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Expense {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
