//! Mock implementations for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::types::strip_hash_prefix;
use crate::domain::{
    AccountId, AppError, Block, DatabaseClient, DatabaseError, HbarAmount, OperationSlice,
};

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub should_fail: bool,
    pub error_message: Option<String>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Default)]
struct Ledger {
    blocks: BTreeMap<i64, Block>,
    /// Balance snapshots per account, keyed by the block index they took effect at
    balances: HashMap<AccountId, BTreeMap<i64, HbarAmount>>,
    transactions: HashMap<(i64, String), OperationSlice>,
}

/// In-memory ledger standing in for the Postgres store
pub struct MockDatabaseClient {
    ledger: Arc<Mutex<Ledger>>,
    config: MockConfig,
    is_healthy: AtomicBool,
}

impl MockDatabaseClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::default())),
            config,
            is_healthy: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    pub fn add_block(&self, block: Block) {
        self.ledger.lock().unwrap().blocks.insert(block.index, block);
    }

    /// Record the balance an account holds from `block_index` onwards
    pub fn set_balance(&self, account: AccountId, block_index: i64, amount: HbarAmount) {
        self.ledger
            .lock()
            .unwrap()
            .balances
            .entry(account)
            .or_default()
            .insert(block_index, amount);
    }

    pub fn add_transaction(&self, block_index: i64, hash: &str, operations: OperationSlice) {
        self.ledger
            .lock()
            .unwrap()
            .transactions
            .insert((block_index, strip_hash_prefix(hash).to_string()), operations);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Unhealthy".to_string(),
            )));
        }
        self.check_should_fail()
    }

    async fn genesis_block(&self) -> Result<Option<Block>, AppError> {
        self.check_should_fail()?;
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.blocks.values().next().cloned())
    }

    async fn latest_block(&self) -> Result<Option<Block>, AppError> {
        self.check_should_fail()?;
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.blocks.values().next_back().cloned())
    }

    async fn block_by_index(&self, index: i64) -> Result<Option<Block>, AppError> {
        self.check_should_fail()?;
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.blocks.get(&index).cloned())
    }

    async fn block_by_hash(&self, hash: &str) -> Result<Option<Block>, AppError> {
        self.check_should_fail()?;
        let hash = strip_hash_prefix(hash);
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .blocks
            .values()
            .find(|b| strip_hash_prefix(&b.hash) == hash)
            .cloned())
    }

    async fn account_balance_at(
        &self,
        account: &AccountId,
        block: &Block,
    ) -> Result<HbarAmount, AppError> {
        self.check_should_fail()?;
        let ledger = self.ledger.lock().unwrap();
        let balance = ledger
            .balances
            .get(account)
            .and_then(|history| history.range(..=block.index).next_back())
            .map(|(_, amount)| *amount)
            .unwrap_or_default();
        Ok(balance)
    }

    async fn transaction_operations(
        &self,
        block: &Block,
        hash: &str,
    ) -> Result<Option<OperationSlice>, AppError> {
        self.check_should_fail()?;
        let ledger = self.ledger.lock().unwrap();
        let key = (block.index, strip_hash_prefix(hash).to_string());
        Ok(ledger.transactions.get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: i64) -> Block {
        Block {
            index,
            hash: format!("{:02x}", index + 10),
            parent_hash: format!("{:02x}", index + 9),
            consensus_start_ns: index * 1_000_000_000,
            consensus_end_ns: index * 1_000_000_000 + 999,
        }
    }

    #[tokio::test]
    async fn test_blocks_ordered_by_index() {
        let db = MockDatabaseClient::new();
        db.add_block(block(2));
        db.add_block(block(0));
        db.add_block(block(1));

        assert_eq!(db.genesis_block().await.unwrap().unwrap().index, 0);
        assert_eq!(db.latest_block().await.unwrap().unwrap().index, 2);
        assert_eq!(db.block_by_hash("0x0b").await.unwrap().unwrap().index, 1);
    }

    #[tokio::test]
    async fn test_balance_uses_latest_snapshot_at_or_before_block() {
        let db = MockDatabaseClient::new();
        let account: AccountId = "0.0.98".parse().unwrap();
        db.set_balance(account, 1, HbarAmount::new(5));
        db.set_balance(account, 3, HbarAmount::new(8));

        for (index, expected) in [(0, 0), (2, 5), (3, 8)] {
            let balance = db.account_balance_at(&account, &block(index)).await.unwrap();
            assert_eq!(balance, HbarAmount::new(expected));
        }
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let db = MockDatabaseClient::failing("boom");
        assert!(matches!(
            db.latest_block().await,
            Err(AppError::Database(DatabaseError::Query(msg))) if msg == "boom"
        ));
    }
}
