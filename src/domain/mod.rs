//! Domain layer containing ledger types, Rosetta mappings, traits and errors.

pub mod account;
pub mod amount;
pub mod error;
pub mod operation;
pub mod rosetta;
pub mod traits;
pub mod types;

pub use account::{AccountId, EntityId};
pub use amount::{AmountSlice, HBAR, HbarAmount, NativeCurrency};
pub use error::{
    AppError, ConfigError, DatabaseError, ErrorCode, ExternalServiceError, ValidationError,
};
pub use operation::{Operation, OperationSlice};
pub use traits::{DatabaseClient, HealthCheck};
pub use types::{
    BLOCKCHAIN_NAME, Block, HealthResponse, HealthStatus, NetworkConfig, TransactionResult,
    TransactionType,
};
