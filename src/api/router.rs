//! Router construction.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;

use super::handlers::{
    ApiDoc, account_balance_handler, block_transaction_handler, liveness_handler,
    network_list_handler, network_options_handler, network_status_handler, readiness_handler,
};

/// Build the application router with all Rosetta and health routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let rosetta_routes = Router::new()
        .route("/network/list", post(network_list_handler))
        .route("/network/status", post(network_status_handler))
        .route("/network/options", post(network_options_handler))
        .route("/account/balance", post(account_balance_handler))
        .route("/block/transaction", post(block_transaction_handler));

    let health_routes = Router::new()
        .route("/health/liveness", get(liveness_handler))
        .route("/health/readiness", get(readiness_handler));

    Router::new()
        .merge(rosetta_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
