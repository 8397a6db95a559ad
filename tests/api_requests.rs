//! Request flows through the router, backed by the in-memory ledger.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use mirror_rosetta::api::create_router;
use mirror_rosetta::app::AppState;
use mirror_rosetta::domain::rosetta::{
    AccountBalanceResponse, BlockTransactionResponse, Error, NetworkListResponse,
    NetworkOptionsResponse, NetworkStatusResponse,
};
use mirror_rosetta::domain::{
    AccountId, Block, ErrorCode, HBAR, HbarAmount, NetworkConfig, Operation, OperationSlice,
};
use mirror_rosetta::test_utils::MockDatabaseClient;

fn block(index: i64) -> Block {
    Block {
        index,
        hash: format!("{:02x}", index + 10),
        parent_hash: format!("{:02x}", index + 9),
        consensus_start_ns: index * 1_000_000_000,
        consensus_end_ns: index * 1_000_000_000 + 999,
    }
}

fn account(address: &str) -> AccountId {
    address.parse().unwrap()
}

fn seeded_db() -> MockDatabaseClient {
    let db = MockDatabaseClient::new();
    for i in 0..3 {
        db.add_block(block(i));
    }
    db.set_balance(account("0.0.1001"), 1, HbarAmount::new(250));
    db.set_balance(account("0.0.1001"), 2, HbarAmount::new(400));
    db.add_transaction(
        1,
        "c0ffee",
        OperationSlice::new(vec![
            Operation::new(
                account("0.0.1001"),
                0,
                "SUCCESS",
                "CRYPTOTRANSFER",
                Some(HbarAmount::new(-150)),
            ),
            Operation::new(
                account("0.0.98"),
                1,
                "SUCCESS",
                "CRYPTOTRANSFER",
                Some(HbarAmount::new(150)),
            ),
        ]),
    );
    db
}

fn router_with(db: MockDatabaseClient, network: NetworkConfig) -> Router {
    create_router(Arc::new(AppState::new(Arc::new(db), network)))
}

fn test_router() -> Router {
    router_with(seeded_db(), NetworkConfig::default())
}

fn network_identifier() -> Value {
    json!({ "blockchain": "Hedera", "network": "testnet" })
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn rosetta_error(bytes: &[u8]) -> Error {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_network_list() {
    let (status, body) = post_json(test_router(), "/network/list", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let list: NetworkListResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.network_identifiers.len(), 1);
    assert_eq!(list.network_identifiers[0].blockchain, "Hedera");
    assert_eq!(list.network_identifiers[0].network, "testnet");
}

#[tokio::test]
async fn test_network_status() {
    let (status, body) = post_json(
        test_router(),
        "/network/status",
        json!({ "network_identifier": network_identifier() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: NetworkStatusResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.genesis_block_identifier.index, 0);
    assert_eq!(response.genesis_block_identifier.hash, "0x0a");
    assert_eq!(response.current_block_identifier.index, 2);
    assert_eq!(response.current_block_identifier.hash, "0x0c");
    assert_eq!(response.current_block_timestamp, 2_000);
    assert!(response.peers.is_empty());
}

#[tokio::test]
async fn test_network_status_wrong_network() {
    let (status, body) = post_json(
        test_router(),
        "/network/status",
        json!({ "network_identifier": { "blockchain": "Hedera", "network": "mainnet" } }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rosetta_error(&body).code, ErrorCode::InvalidNetwork.code());
}

#[tokio::test]
async fn test_network_options() {
    let (status, body) = post_json(
        test_router(),
        "/network/options",
        json!({ "network_identifier": network_identifier() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let options: NetworkOptionsResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(options.version.rosetta_version, "1.4.13");
    assert!(options.allow.historical_balance_lookup);
    assert_eq!(options.allow.errors.len(), ErrorCode::ALL.len());
    assert!(
        options
            .allow
            .operation_statuses
            .iter()
            .any(|s| s.status == "SUCCESS" && s.successful)
    );
    assert!(
        options
            .allow
            .operation_types
            .contains(&"CRYPTOTRANSFER".to_string())
    );
}

#[tokio::test]
async fn test_account_balance_latest_block() {
    let (status, body) = post_json(
        test_router(),
        "/account/balance",
        json!({
            "network_identifier": network_identifier(),
            "account_identifier": { "address": "0.0.1001" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: AccountBalanceResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.block_identifier.index, 2);
    assert_eq!(response.balances.len(), 1);
    assert_eq!(response.balances[0].value, "400");
    assert_eq!(response.balances[0].currency, HBAR.to_rosetta());
}

#[tokio::test]
async fn test_account_balance_historical_block() {
    let (status, body) = post_json(
        test_router(),
        "/account/balance",
        json!({
            "network_identifier": network_identifier(),
            "account_identifier": { "address": "0.0.1001" },
            "block_identifier": { "index": 1 },
            "currencies": [{ "symbol": "HBAR", "decimals": HBAR.decimals }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: AccountBalanceResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.block_identifier.hash, "0x0b");
    assert_eq!(response.balances[0].value, "250");
}

#[tokio::test]
async fn test_account_balance_rejects_foreign_currency() {
    let (status, body) = post_json(
        test_router(),
        "/account/balance",
        json!({
            "network_identifier": network_identifier(),
            "account_identifier": { "address": "0.0.1001" },
            "currencies": [{ "symbol": "foobar", "decimals": HBAR.decimals }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rosetta_error(&body).code, ErrorCode::InvalidCurrency.code());
}

#[tokio::test]
async fn test_account_balance_invalid_address() {
    let (status, body) = post_json(
        test_router(),
        "/account/balance",
        json!({
            "network_identifier": network_identifier(),
            "account_identifier": { "address": "not-an-account" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rosetta_error(&body).code, ErrorCode::InvalidAccount.code());
}

#[tokio::test]
async fn test_account_balance_unknown_block() {
    let (status, body) = post_json(
        test_router(),
        "/account/balance",
        json!({
            "network_identifier": network_identifier(),
            "account_identifier": { "address": "0.0.1001" },
            "block_identifier": { "index": 99 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error = rosetta_error(&body);
    assert_eq!(error.code, ErrorCode::BlockNotFound.code());
    assert!(error.retriable);
}

#[tokio::test]
async fn test_block_transaction() {
    let (status, body) = post_json(
        test_router(),
        "/block/transaction",
        json!({
            "network_identifier": network_identifier(),
            "block_identifier": { "index": 1, "hash": "0x0b" },
            "transaction_identifier": { "hash": "0xc0ffee" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: BlockTransactionResponse = serde_json::from_slice(&body).unwrap();
    let transaction = response.transaction;
    assert_eq!(transaction.transaction_identifier.hash, "0xc0ffee");
    assert_eq!(transaction.operations.len(), 2);

    let debit = &transaction.operations[0];
    assert_eq!(debit.operation_identifier.index, 0);
    assert_eq!(debit.r#type, "CRYPTOTRANSFER");
    assert_eq!(debit.status.as_deref(), Some("SUCCESS"));
    assert_eq!(debit.account.as_ref().unwrap().address, "0.0.1001");
    assert_eq!(debit.amount.as_ref().unwrap().value, "-150");
}

#[tokio::test]
async fn test_block_transaction_not_found() {
    let (status, body) = post_json(
        test_router(),
        "/block/transaction",
        json!({
            "network_identifier": network_identifier(),
            "block_identifier": { "index": 2, "hash": "0x0c" },
            "transaction_identifier": { "hash": "0xc0ffee" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        rosetta_error(&body).code,
        ErrorCode::TransactionNotFound.code()
    );
}

#[tokio::test]
async fn test_offline_mode_rejects_data_endpoints() {
    let mut network = NetworkConfig::default();
    network.online = false;

    let (status, body) = post_json(
        router_with(seeded_db(), network),
        "/network/status",
        json!({ "network_identifier": network_identifier() }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rosetta_error(&body).code, ErrorCode::NotImplemented.code());
}

#[tokio::test]
async fn test_liveness() {
    let (status, body) = get(test_router(), "/health/liveness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_healthy() {
    let (status, body) = get(test_router(), "/health/readiness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["postgresql"], "healthy");
}

#[tokio::test]
async fn test_readiness_unhealthy_database() {
    let db = seeded_db();
    db.set_healthy(false);

    let (status, body) = get(
        router_with(db, NetworkConfig::default()),
        "/health/readiness",
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["postgresql"], "unhealthy");
    assert!(body["failures"]["postgresql"].is_string());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = get(test_router(), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/account/balance"].is_object());
}
