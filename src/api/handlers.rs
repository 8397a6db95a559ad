//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::rosetta::{
    self, AccountBalanceRequest, AccountBalanceResponse, BlockTransactionRequest,
    BlockTransactionResponse, MetadataRequest, NetworkListResponse, NetworkOptionsResponse,
    NetworkRequest, NetworkStatusResponse,
};
use crate::domain::{AppError, ErrorCode, HealthResponse, HealthStatus};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mirror Rosetta API",
        version = "0.1.0",
        description = "Rosetta Data API over mirror node ledger state",
        license(
            name = "Apache-2.0"
        )
    ),
    paths(
        network_list_handler,
        network_status_handler,
        network_options_handler,
        account_balance_handler,
        block_transaction_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            rosetta::Currency,
            rosetta::Amount,
            rosetta::AccountIdentifier,
            rosetta::Operation,
            rosetta::OperationIdentifier,
            rosetta::NetworkIdentifier,
            rosetta::BlockIdentifier,
            rosetta::PartialBlockIdentifier,
            rosetta::TransactionIdentifier,
            rosetta::Transaction,
            rosetta::Error,
            MetadataRequest,
            NetworkRequest,
            AccountBalanceRequest,
            BlockTransactionRequest,
            NetworkListResponse,
            NetworkStatusResponse,
            NetworkOptionsResponse,
            AccountBalanceResponse,
            BlockTransactionResponse,
            HealthResponse,
            HealthStatus,
        )
    ),
    tags(
        (name = "network", description = "Network identity and status"),
        (name = "account", description = "Account balances"),
        (name = "block", description = "Blocks and transactions"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// List the networks served by this instance
#[utoipa::path(
    post,
    path = "/network/list",
    tag = "network",
    request_body = MetadataRequest,
    responses(
        (status = 200, description = "Available networks", body = NetworkListResponse)
    )
)]
pub async fn network_list_handler(
    State(state): State<Arc<AppState>>,
    Json(_payload): Json<MetadataRequest>,
) -> Json<NetworkListResponse> {
    Json(state.service.network_list())
}

/// Current and genesis block of the network
#[utoipa::path(
    post,
    path = "/network/status",
    tag = "network",
    request_body = NetworkRequest,
    responses(
        (status = 200, description = "Network status", body = NetworkStatusResponse),
        (status = 500, description = "Rosetta error", body = rosetta::Error)
    )
)]
pub async fn network_status_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NetworkRequest>,
) -> Result<Json<NetworkStatusResponse>, AppError> {
    let response = state.service.network_status(&payload).await?;
    Ok(Json(response))
}

/// Versions, operation statuses and types, and the error catalog
#[utoipa::path(
    post,
    path = "/network/options",
    tag = "network",
    request_body = NetworkRequest,
    responses(
        (status = 200, description = "Network options", body = NetworkOptionsResponse),
        (status = 500, description = "Rosetta error", body = rosetta::Error)
    )
)]
pub async fn network_options_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NetworkRequest>,
) -> Result<Json<NetworkOptionsResponse>, AppError> {
    let response = state.service.network_options(&payload)?;
    Ok(Json(response))
}

/// HBAR balance of an account
#[utoipa::path(
    post,
    path = "/account/balance",
    tag = "account",
    request_body = AccountBalanceRequest,
    responses(
        (status = 200, description = "Account balance", body = AccountBalanceResponse),
        (status = 500, description = "Rosetta error", body = rosetta::Error)
    )
)]
pub async fn account_balance_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AccountBalanceRequest>,
) -> Result<Json<AccountBalanceResponse>, AppError> {
    let response = state.service.account_balance(&payload).await?;
    Ok(Json(response))
}

/// Operations of a transaction within a block
#[utoipa::path(
    post,
    path = "/block/transaction",
    tag = "block",
    request_body = BlockTransactionRequest,
    responses(
        (status = 200, description = "Transaction", body = BlockTransactionResponse),
        (status = 500, description = "Rosetta error", body = rosetta::Error)
    )
)]
pub async fn block_transaction_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BlockTransactionRequest>,
) -> Result<Json<BlockTransactionResponse>, AppError> {
    let response = state.service.block_transaction(&payload).await?;
    Ok(Json(response))
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/liveness",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive", body = HealthResponse)
    )
)]
pub async fn liveness_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.health.liveness())
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/readiness",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic", body = HealthResponse),
        (status = 503, description = "Application is not ready", body = HealthResponse)
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health.readiness().await;
    let status = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}

// Rosetta clients expect every error as HTTP 500 with an error object body.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = self.to_rosetta();

        match self.error_code() {
            ErrorCode::DatabaseError
            | ErrorCode::ExternalServiceError
            | ErrorCode::InternalServerError => {
                error!(code = body.code, error = %self, "Server error");
            }
            _ => {
                warn!(code = body.code, error = %self, "Request rejected");
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_app_error_renders_rosetta_error() {
        let err = AppError::Validation(ValidationError::InvalidCurrency("foobar".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: rosetta::Error = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, ErrorCode::InvalidCurrency.code());
        assert_eq!(body.message, "Invalid currency");
        assert!(!body.retriable);
    }

    #[test]
    fn test_openapi_document_lists_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/network/list",
            "/network/status",
            "/network/options",
            "/account/balance",
            "/block/transaction",
            "/health/liveness",
            "/health/readiness",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
