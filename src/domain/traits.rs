//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::account::AccountId;
use super::amount::HbarAmount;
use super::error::AppError;
use super::operation::OperationSlice;
use super::types::Block;

/// Read-only access to the ledger store
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// First block of the ledger
    async fn genesis_block(&self) -> Result<Option<Block>, AppError>;

    /// Most recent block of the ledger
    async fn latest_block(&self) -> Result<Option<Block>, AppError>;

    async fn block_by_index(&self, index: i64) -> Result<Option<Block>, AppError>;

    /// Look a block up by its hash, without the `0x` prefix
    async fn block_by_hash(&self, hash: &str) -> Result<Option<Block>, AppError>;

    /// Balance of an account as of the end of `block`
    async fn account_balance_at(
        &self,
        account: &AccountId,
        block: &Block,
    ) -> Result<HbarAmount, AppError>;

    /// Operations of the transaction `hash` within `block`, if it exists there
    async fn transaction_operations(
        &self,
        block: &Block,
        hash: &str,
    ) -> Result<Option<OperationSlice>, AppError>;
}

/// A named readiness check
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name reported in the readiness response and logs
    fn name(&self) -> &'static str;

    async fn check(&self) -> Result<(), AppError>;
}
