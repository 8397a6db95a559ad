//! Error types for the application.
//!
//! Every [`AppError`] maps onto a stable Rosetta error code so clients can
//! branch on `code` instead of parsing messages.

use serde_json::Value;
use thiserror::Error;

use super::rosetta;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("External service error: {0}")]
    ExternalService(#[from] ExternalServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::InvalidData(err.to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(DatabaseError::from(err))
    }
}

/// Input validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount value is not a base-10 64-bit integer
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Currency symbol, decimals or metadata do not match the native currency
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Invalid entity id: {0}")]
    InvalidEntityId(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

/// Errors talking to other HTTP services
#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Rosetta error catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidAccount,
    InvalidAmount,
    InvalidCurrency,
    InvalidNetwork,
    InvalidRequest,
    BlockNotFound,
    TransactionNotFound,
    DatabaseError,
    ExternalServiceError,
    InternalServerError,
    NotImplemented,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 11] = [
        Self::InvalidAccount,
        Self::InvalidAmount,
        Self::InvalidCurrency,
        Self::InvalidNetwork,
        Self::InvalidRequest,
        Self::BlockNotFound,
        Self::TransactionNotFound,
        Self::DatabaseError,
        Self::ExternalServiceError,
        Self::InternalServerError,
        Self::NotImplemented,
    ];

    pub fn code(self) -> i32 {
        match self {
            Self::InvalidAccount => 101,
            Self::InvalidAmount => 102,
            Self::InvalidCurrency => 103,
            Self::InvalidNetwork => 104,
            Self::InvalidRequest => 105,
            Self::BlockNotFound => 106,
            Self::TransactionNotFound => 107,
            Self::DatabaseError => 108,
            Self::ExternalServiceError => 109,
            Self::InternalServerError => 110,
            Self::NotImplemented => 111,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidAccount => "Invalid account",
            Self::InvalidAmount => "Invalid amount",
            Self::InvalidCurrency => "Invalid currency",
            Self::InvalidNetwork => "Invalid network identifier",
            Self::InvalidRequest => "Invalid request",
            Self::BlockNotFound => "Block not found",
            Self::TransactionNotFound => "Transaction not found",
            Self::DatabaseError => "Database error",
            Self::ExternalServiceError => "External service error",
            Self::InternalServerError => "Internal server error",
            Self::NotImplemented => "Not implemented",
        }
    }

    pub fn retriable(self) -> bool {
        matches!(
            self,
            Self::BlockNotFound | Self::DatabaseError | Self::ExternalServiceError
        )
    }

    pub fn to_rosetta(self) -> rosetta::Error {
        rosetta::Error {
            code: self.code(),
            message: self.message().to_string(),
            retriable: self.retriable(),
            details: None,
        }
    }

    /// Every error this server can return, for `/network/options`
    pub fn catalog() -> Vec<rosetta::Error> {
        Self::ALL.iter().map(|code| code.to_rosetta()).collect()
    }
}

impl AppError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Validation(err) => match err {
                ValidationError::InvalidAmount(_) => ErrorCode::InvalidAmount,
                ValidationError::InvalidCurrency(_) => ErrorCode::InvalidCurrency,
                ValidationError::InvalidAccount(_) | ValidationError::InvalidEntityId(_) => {
                    ErrorCode::InvalidAccount
                }
                ValidationError::InvalidNetwork(_) => ErrorCode::InvalidNetwork,
                ValidationError::InvalidField { .. } => ErrorCode::InvalidRequest,
            },
            Self::ExternalService(_) => ErrorCode::ExternalServiceError,
            Self::Config(_) | Self::Internal(_) => ErrorCode::InternalServerError,
            Self::BlockNotFound(_) => ErrorCode::BlockNotFound,
            Self::TransactionNotFound(_) => ErrorCode::TransactionNotFound,
            Self::NotSupported(_) => ErrorCode::NotImplemented,
        }
    }

    /// Rosetta error object carrying this error's description in `details`
    pub fn to_rosetta(&self) -> rosetta::Error {
        let mut error = self.error_code().to_rosetta();
        let mut details = rosetta::Metadata::new();
        details.insert("reason".to_string(), Value::String(self.to_string()));
        error.details = Some(details);
        error
    }
}
