//! Unified error types for the order ledger.
//!
//! Store failures are classified exactly once, at the SeaORM boundary, into a
//! structured [`StoreErrorKind`] so that no caller ever has to match on driver
//! message text. User-facing guidance is derived from the kind via
//! [`Error::user_message`].

use sea_orm::DbErr;
use thiserror::Error;

/// Structured classification of a store-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The operation violated a foreign-key constraint (related records exist).
    ReferentialIntegrity,
    /// The store rejected the operation for lack of permissions.
    PermissionDenied,
    /// Any other store failure; the message passes through verbatim.
    Unknown,
}

/// Unified error type for all ledger operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Input rejected before any store call.
    #[error("Validation error: {message}")]
    Validation {
        /// Which input was rejected and why
        message: String,
    },

    /// A monetary amount was non-positive or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// A line-item quantity was zero or negative.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i32,
    },

    /// A price was negative or not finite.
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The offending price
        price: f64,
    },

    /// A status string outside the enumerated order statuses.
    #[error("Unknown order status: {value}")]
    UnknownStatus {
        /// The raw status string
        value: String,
    },

    /// A role string outside the enumerated employee roles.
    #[error("Unknown employee role: {value}")]
    UnknownRole {
        /// The raw role string
        value: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Table/aggregate the lookup ran against
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// A store operation failed; `kind` carries the structured classification.
    #[error("Store error: {message}")]
    Store {
        /// Structured classification of the failure
        kind: StoreErrorKind,
        /// Driver message, passed through verbatim
        message: String,
    },

    /// I/O failure (export files, session storage).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session storage (de)serialization failure.
    #[error("Session storage error: {0}")]
    SessionStorage(#[from] serde_json::Error),
}

/// Classifies a raw store message into a [`StoreErrorKind`].
///
/// SQLite reports constraint violations as "FOREIGN KEY constraint failed";
/// Postgres-style stores say "violates foreign key constraint". Matching is
/// case-insensitive on the "foreign key" and "permission" substrings.
#[must_use]
pub fn classify_store_message(message: &str) -> StoreErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("foreign key") {
        StoreErrorKind::ReferentialIntegrity
    } else if lower.contains("permission") {
        StoreErrorKind::PermissionDenied
    } else {
        StoreErrorKind::Unknown
    }
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        let message = value.to_string();
        Self::Store {
            kind: classify_store_message(&message),
            message,
        }
    }
}

impl Error {
    /// Returns the message suitable for direct display to the user.
    ///
    /// Referential-integrity and permission failures get remapped guidance;
    /// everything else renders its display text verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store {
                kind: StoreErrorKind::ReferentialIntegrity,
                ..
            } => "Cannot delete: related records exist (for example orders or line items). \
                  Remove or change the related data first."
                .to_string(),
            Self::Store {
                kind: StoreErrorKind::PermissionDenied,
                ..
            } => "Insufficient permissions for this operation.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
