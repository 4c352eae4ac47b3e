//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a trip, one of its elements or a user is not
//!   found (or not owned by the caller).
//! - [`ExistingKey`] thrown when a unique value is already taken.
//! - [`InvalidAmount`], [`InvalidField`], [`InvalidCurrency`] thrown when a
//!   draft fails validation.
//! - [`ManagedExpense`] thrown when a caller tries to edit an expense that is
//!   owned by a transportation/accommodation entry.
//! - [`InvalidToken`] thrown when a refresh token is unknown or expired.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`InvalidCurrency`]: EngineError::InvalidCurrency
//!  [`ManagedExpense`]: EngineError::ManagedExpense
//!  [`InvalidToken`]: EngineError::InvalidToken
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0} already in use")]
    ExistingKey(String),
    #[error("{0}")]
    InvalidAmount(String),
    #[error("{0}")]
    InvalidField(String),
    #[error("unsupported currency: {0}")]
    InvalidCurrency(String),
    #[error("expense is managed by its {0} entry")]
    ManagedExpense(String),
    #[error("{0}")]
    InvalidToken(String),
    #[error("corrupt trip document: {0}")]
    Document(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::InvalidCurrency(a), Self::InvalidCurrency(b)) => a == b,
            (Self::ManagedExpense(a), Self::ManagedExpense(b)) => a == b,
            (Self::InvalidToken(a), Self::InvalidToken(b)) => a == b,
            (Self::Document(a), Self::Document(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
