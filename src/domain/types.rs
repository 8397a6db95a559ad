//! Ledger and service types shared across layers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rosetta;

/// Blockchain name reported in every network identifier
pub const BLOCKCHAIN_NAME: &str = "Hedera";

/// Render a stored hex hash in the `0x`-prefixed form used on the wire
pub fn format_hash(hash: &str) -> String {
    if hash.starts_with("0x") {
        hash.to_string()
    } else {
        format!("0x{}", hash)
    }
}

/// Strip the wire `0x` prefix before looking a hash up in storage
pub fn strip_hash_prefix(hash: &str) -> &str {
    hash.strip_prefix("0x").unwrap_or(hash)
}

/// Storage form of a wire hash: unprefixed lowercase hex
pub fn normalize_hash(hash: &str) -> String {
    strip_hash_prefix(hash).to_ascii_lowercase()
}

/// Network this server answers for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub blockchain: String,
    pub network: String,
    pub node_version: String,
    pub online: bool,
}

impl NetworkConfig {
    #[must_use]
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            blockchain: BLOCKCHAIN_NAME.to_string(),
            network: network.into(),
            node_version: "0".to_string(),
            online: true,
        }
    }

    pub fn network_identifier(&self) -> rosetta::NetworkIdentifier {
        rosetta::NetworkIdentifier {
            blockchain: self.blockchain.clone(),
            network: self.network.clone(),
        }
    }

    /// Blockchain must match exactly; the network name is case-insensitive.
    pub fn matches(&self, identifier: &rosetta::NetworkIdentifier) -> bool {
        identifier.blockchain == self.blockchain
            && identifier.network.eq_ignore_ascii_case(&self.network)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new("testnet")
    }
}

/// A record file, which Rosetta exposes as a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub index: i64,
    pub hash: String,
    pub parent_hash: String,
    /// Consensus timestamp of the first transaction, in nanoseconds
    pub consensus_start_ns: i64,
    /// Consensus timestamp of the last transaction, in nanoseconds
    pub consensus_end_ns: i64,
}

impl Block {
    pub fn identifier(&self) -> rosetta::BlockIdentifier {
        rosetta::BlockIdentifier {
            index: self.index,
            hash: format_hash(&self.hash),
        }
    }

    /// Block timestamp in milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.consensus_start_ns / 1_000_000
    }
}

/// Result code of a ledger transaction, surfaced as the operation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionResult {
    InvalidSignature,
    InsufficientPayerBalance,
    DuplicateTransaction,
    InvalidAccountId,
    Unknown,
    Success,
    InsufficientAccountBalance,
}

impl TransactionResult {
    pub const ALL: [TransactionResult; 7] = [
        Self::InvalidSignature,
        Self::InsufficientPayerBalance,
        Self::DuplicateTransaction,
        Self::InvalidAccountId,
        Self::Unknown,
        Self::Success,
        Self::InsufficientAccountBalance,
    ];

    /// Unrecognized codes map to [`TransactionResult::Unknown`]
    pub fn from_code(code: i16) -> Self {
        match code {
            7 => Self::InvalidSignature,
            10 => Self::InsufficientPayerBalance,
            11 => Self::DuplicateTransaction,
            15 => Self::InvalidAccountId,
            22 => Self::Success,
            28 => Self::InsufficientAccountBalance,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Self::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::Unknown => "UNKNOWN",
            Self::Success => "SUCCESS",
            Self::InsufficientAccountBalance => "INSUFFICIENT_ACCOUNT_BALANCE",
        }
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn to_rosetta(&self) -> rosetta::OperationStatus {
        rosetta::OperationStatus {
            status: self.as_str().to_string(),
            successful: self.is_successful(),
        }
    }
}

impl std::fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger transaction type, surfaced as the operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    ContractCall,
    ContractCreate,
    CryptoCreateAccount,
    CryptoDelete,
    CryptoTransfer,
    CryptoUpdateAccount,
    FileCreate,
    ConsensusSubmitMessage,
    Unknown,
}

impl TransactionType {
    pub const ALL: [TransactionType; 9] = [
        Self::ContractCall,
        Self::ContractCreate,
        Self::CryptoCreateAccount,
        Self::CryptoDelete,
        Self::CryptoTransfer,
        Self::CryptoUpdateAccount,
        Self::FileCreate,
        Self::ConsensusSubmitMessage,
        Self::Unknown,
    ];

    pub fn from_code(code: i16) -> Self {
        match code {
            7 => Self::ContractCall,
            8 => Self::ContractCreate,
            11 => Self::CryptoCreateAccount,
            12 => Self::CryptoDelete,
            14 => Self::CryptoTransfer,
            15 => Self::CryptoUpdateAccount,
            17 => Self::FileCreate,
            27 => Self::ConsensusSubmitMessage,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContractCall => "CONTRACTCALL",
            Self::ContractCreate => "CONTRACTCREATEINSTANCE",
            Self::CryptoCreateAccount => "CRYPTOCREATEACCOUNT",
            Self::CryptoDelete => "CRYPTODELETE",
            Self::CryptoTransfer => "CRYPTOTRANSFER",
            Self::CryptoUpdateAccount => "CRYPTOUPDATEACCOUNT",
            Self::FileCreate => "FILECREATE",
            Self::ConsensusSubmitMessage => "CONSENSUSSUBMITMESSAGE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Health status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Check passed
    Healthy,
    /// Check failed or timed out
    Unhealthy,
}

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status: healthy only when every check passed
    pub status: HealthStatus,
    /// Status per named check
    pub checks: BTreeMap<String, HealthStatus>,
    /// Failure reason per failed check
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthResponse {
    #[must_use]
    pub fn new(
        checks: BTreeMap<String, HealthStatus>,
        failures: BTreeMap<String, String>,
    ) -> Self {
        let status = if checks.values().all(|s| *s == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            checks,
            failures,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Response with no checks, which is always healthy
    #[must_use]
    pub fn alive() -> Self {
        Self::new(BTreeMap::new(), BTreeMap::new())
    }
}
