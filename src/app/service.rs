//! Rosetta data API business logic.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::rosetta::{
    AccountBalanceRequest, AccountBalanceResponse, Allow, BlockTransactionRequest,
    BlockTransactionResponse, NetworkIdentifier, NetworkListResponse, NetworkOptionsResponse,
    NetworkRequest, NetworkStatusResponse, PartialBlockIdentifier, ROSETTA_VERSION, Transaction,
    TransactionIdentifier, Version,
};
use crate::domain::types::{format_hash, normalize_hash, strip_hash_prefix};
use crate::domain::{
    AccountId, AmountSlice, AppError, Block, DatabaseClient, ErrorCode, HBAR, NetworkConfig,
    TransactionResult, TransactionType, ValidationError,
};

/// Application service answering Rosetta data API requests
pub struct RosettaService {
    db_client: Arc<dyn DatabaseClient>,
    network: NetworkConfig,
}

impl RosettaService {
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>, network: NetworkConfig) -> Self {
        Self { db_client, network }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Networks served by this instance
    pub fn network_list(&self) -> NetworkListResponse {
        NetworkListResponse {
            network_identifiers: vec![self.network.network_identifier()],
        }
    }

    /// Genesis and latest block of the ledger
    #[instrument(skip(self, request))]
    pub async fn network_status(
        &self,
        request: &NetworkRequest,
    ) -> Result<NetworkStatusResponse, AppError> {
        self.validate_network(&request.network_identifier)?;
        self.require_online("/network/status")?;

        let genesis = self
            .db_client
            .genesis_block()
            .await?
            .ok_or_else(|| AppError::BlockNotFound("genesis block".to_string()))?;
        let latest = self
            .db_client
            .latest_block()
            .await?
            .ok_or_else(|| AppError::BlockNotFound("latest block".to_string()))?;

        Ok(NetworkStatusResponse {
            current_block_identifier: latest.identifier(),
            current_block_timestamp: latest.timestamp_millis(),
            genesis_block_identifier: genesis.identifier(),
            peers: Vec::new(),
        })
    }

    /// Version information and everything this server may return
    pub fn network_options(
        &self,
        request: &NetworkRequest,
    ) -> Result<NetworkOptionsResponse, AppError> {
        self.validate_network(&request.network_identifier)?;

        Ok(NetworkOptionsResponse {
            version: Version {
                rosetta_version: ROSETTA_VERSION.to_string(),
                node_version: self.network.node_version.clone(),
                middleware_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            allow: Allow {
                operation_statuses: TransactionResult::ALL
                    .iter()
                    .map(TransactionResult::to_rosetta)
                    .collect(),
                operation_types: TransactionType::ALL
                    .iter()
                    .map(|t| t.as_str().to_string())
                    .collect(),
                errors: ErrorCode::catalog(),
                historical_balance_lookup: true,
            },
        })
    }

    /// HBAR balance of an account at the requested (or latest) block
    #[instrument(skip(self, request), fields(account = %request.account_identifier.address))]
    pub async fn account_balance(
        &self,
        request: &AccountBalanceRequest,
    ) -> Result<AccountBalanceResponse, AppError> {
        self.validate_network(&request.network_identifier)?;
        self.require_online("/account/balance")?;

        request.account_identifier.validate().map_err(|e| {
            AppError::Validation(ValidationError::InvalidAccount(e.to_string()))
        })?;
        let account = AccountId::from_rosetta(&request.account_identifier)?;

        if let Some(currencies) = &request.currencies {
            for currency in currencies {
                HBAR.validate(currency).map_err(|e| {
                    warn!(symbol = %currency.symbol, error = %e, "Rejected balance currency filter");
                    e
                })?;
            }
        }

        let block = self.resolve_block(request.block_identifier.as_ref()).await?;
        let balance = self.db_client.account_balance_at(&account, &block).await?;

        Ok(AccountBalanceResponse {
            block_identifier: block.identifier(),
            balances: AmountSlice::new(vec![balance]).to_rosetta(),
        })
    }

    /// Operations of one transaction within a block
    #[instrument(skip(self, request), fields(hash = %request.transaction_identifier.hash))]
    pub async fn block_transaction(
        &self,
        request: &BlockTransactionRequest,
    ) -> Result<BlockTransactionResponse, AppError> {
        self.validate_network(&request.network_identifier)?;
        self.require_online("/block/transaction")?;

        let block = self
            .resolve_block(Some(&PartialBlockIdentifier {
                index: Some(request.block_identifier.index),
                hash: Some(request.block_identifier.hash.clone()),
            }))
            .await?;

        let hash = normalize_hash(&request.transaction_identifier.hash);
        if hash.is_empty() {
            return Err(AppError::Validation(ValidationError::InvalidField {
                field: "transaction_identifier.hash".to_string(),
                message: "must not be empty".to_string(),
            }));
        }

        let operations = self
            .db_client
            .transaction_operations(&block, &hash)
            .await?
            .ok_or_else(|| {
                AppError::TransactionNotFound(format!(
                    "{} in block {}",
                    request.transaction_identifier.hash, block.index
                ))
            })?;

        info!(operations = operations.len(), "Transaction loaded");

        Ok(BlockTransactionResponse {
            transaction: Transaction {
                transaction_identifier: TransactionIdentifier {
                    hash: format_hash(&hash),
                },
                operations: operations.to_rosetta(),
            },
        })
    }

    fn validate_network(&self, identifier: &NetworkIdentifier) -> Result<(), AppError> {
        identifier
            .validate()
            .map_err(|e| AppError::Validation(ValidationError::InvalidNetwork(e.to_string())))?;

        if !self.network.matches(identifier) {
            return Err(AppError::Validation(ValidationError::InvalidNetwork(
                format!(
                    "{}/{} is not served here",
                    identifier.blockchain, identifier.network
                ),
            )));
        }
        Ok(())
    }

    fn require_online(&self, endpoint: &str) -> Result<(), AppError> {
        if self.network.online {
            Ok(())
        } else {
            Err(AppError::NotSupported(format!(
                "{} is not available in offline mode",
                endpoint
            )))
        }
    }

    /// Find the block named by index and/or hash, or the latest block when
    /// neither is given. Both must agree when both are given.
    async fn resolve_block(
        &self,
        identifier: Option<&PartialBlockIdentifier>,
    ) -> Result<Block, AppError> {
        let (index, hash) = match identifier {
            Some(id) => (id.index, id.hash.as_deref().map(normalize_hash)),
            None => (None, None),
        };

        if let Some(index) = index.filter(|i| *i < 0) {
            return Err(AppError::Validation(ValidationError::InvalidField {
                field: "block_identifier.index".to_string(),
                message: format!("must be non-negative, got {}", index),
            }));
        }

        let hash = hash.as_deref();
        let block = match (index, hash) {
            (Some(index), _) => self.db_client.block_by_index(index).await?,
            (None, Some(hash)) => self.db_client.block_by_hash(hash).await?,
            (None, None) => self.db_client.latest_block().await?,
        };

        match (block, hash) {
            (Some(block), Some(hash))
                if !strip_hash_prefix(&block.hash).eq_ignore_ascii_case(hash) =>
            {
                Err(AppError::BlockNotFound(format!(
                    "index {} does not have hash {}",
                    block.index, hash
                )))
            }
            (Some(block), _) => Ok(block),
            (None, _) => Err(AppError::BlockNotFound(match (index, hash) {
                (Some(index), _) => format!("index {}", index),
                (None, Some(hash)) => format!("hash {}", hash),
                (None, None) => "latest block".to_string(),
            })),
        }
    }
}
