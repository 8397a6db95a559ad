//! PostgreSQL ledger store implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::{
    AccountId, AppError, Block, DatabaseClient, DatabaseError, HbarAmount, Operation,
    OperationSlice, TransactionResult, TransactionType,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

const BLOCK_COLUMNS: &str = "index, hash, prev_hash, consensus_start, consensus_end";

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Migration(e.to_string())))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_block(row: &sqlx::postgres::PgRow) -> Result<Block, AppError> {
        Ok(Block {
            index: row.try_get("index")?,
            hash: row.try_get("hash")?,
            parent_hash: row.try_get("prev_hash")?,
            consensus_start_ns: row.try_get("consensus_start")?,
            consensus_end_ns: row.try_get("consensus_end")?,
        })
    }

    async fn fetch_block(
        &self,
        sql: &str,
        bind: Option<BlockKey<'_>>,
    ) -> Result<Option<Block>, AppError> {
        let query = sqlx::query(sql);
        let query = match bind {
            Some(BlockKey::Index(index)) => query.bind(index),
            Some(BlockKey::Hash(hash)) => query.bind(hash),
            None => query,
        };

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        row.as_ref().map(Self::row_to_block).transpose()
    }
}

enum BlockKey<'a> {
    Index(i64),
    Hash(&'a str),
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn genesis_block(&self) -> Result<Option<Block>, AppError> {
        let sql = format!(
            "SELECT {} FROM record_file ORDER BY index ASC LIMIT 1",
            BLOCK_COLUMNS
        );
        self.fetch_block(&sql, None).await
    }

    #[instrument(skip(self))]
    async fn latest_block(&self) -> Result<Option<Block>, AppError> {
        let sql = format!(
            "SELECT {} FROM record_file ORDER BY index DESC LIMIT 1",
            BLOCK_COLUMNS
        );
        self.fetch_block(&sql, None).await
    }

    #[instrument(skip(self))]
    async fn block_by_index(&self, index: i64) -> Result<Option<Block>, AppError> {
        let sql = format!("SELECT {} FROM record_file WHERE index = $1", BLOCK_COLUMNS);
        self.fetch_block(&sql, Some(BlockKey::Index(index))).await
    }

    #[instrument(skip(self))]
    async fn block_by_hash(&self, hash: &str) -> Result<Option<Block>, AppError> {
        let sql = format!("SELECT {} FROM record_file WHERE hash = $1", BLOCK_COLUMNS);
        self.fetch_block(&sql, Some(BlockKey::Hash(hash))).await
    }

    #[instrument(skip(self, account, block), fields(account = %account, block = block.index))]
    async fn account_balance_at(
        &self,
        account: &AccountId,
        block: &Block,
    ) -> Result<HbarAmount, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT AS balance
            FROM crypto_transfer
            WHERE entity_id = $1
              AND consensus_timestamp <= $2
            "#,
        )
        .bind(account.entity_id().encode())
        .bind(block.consensus_end_ns)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        let balance: i64 = row.try_get("balance")?;
        Ok(HbarAmount::new(balance))
    }

    #[instrument(skip(self, block), fields(block = block.index))]
    async fn transaction_operations(
        &self,
        block: &Block,
        hash: &str,
    ) -> Result<Option<OperationSlice>, AppError> {
        let transaction = sqlx::query(
            r#"
            SELECT consensus_timestamp, type, result
            FROM transaction
            WHERE transaction_hash = $1
              AND consensus_timestamp BETWEEN $2 AND $3
            "#,
        )
        .bind(hash)
        .bind(block.consensus_start_ns)
        .bind(block.consensus_end_ns)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        let Some(transaction) = transaction else {
            return Ok(None);
        };

        let consensus_timestamp: i64 = transaction.try_get("consensus_timestamp")?;
        let status = TransactionResult::from_code(transaction.try_get("result")?);
        let operation_type = TransactionType::from_code(transaction.try_get("type")?);

        let transfers = sqlx::query(
            r#"
            SELECT entity_id, amount
            FROM crypto_transfer
            WHERE consensus_timestamp = $1
            ORDER BY entity_id
            "#,
        )
        .bind(consensus_timestamp)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        debug!(transfers = transfers.len(), "Loaded crypto transfers");

        let operations = transfers
            .iter()
            .enumerate()
            .map(|(index, row)| -> Result<Operation, AppError> {
                let account_id = AccountId::from_encoded(row.try_get("entity_id")?)
                    .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
                Ok(Operation::new(
                    account_id,
                    index as i64,
                    status.as_str(),
                    operation_type.as_str(),
                    Some(HbarAmount::new(row.try_get("amount")?)),
                ))
            })
            .collect::<Result<OperationSlice, AppError>>()?;

        Ok(Some(operations))
    }
}
