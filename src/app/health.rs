//! Liveness and readiness probes.
//!
//! Readiness runs each named check in order, each bounded by its own
//! timeout. A single failing check makes the whole probe fail, and every
//! failure is logged and reported under its check name.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::domain::{
    AppError, DatabaseClient, ExternalServiceError, HealthCheck, HealthResponse, HealthStatus,
};
use crate::infra::RosettaHttpClient;

/// Default per-check timeout
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Verifies the ledger store answers queries
pub struct DatabaseHealthCheck {
    db_client: Arc<dyn DatabaseClient>,
}

impl DatabaseHealthCheck {
    pub fn new(db_client: Arc<dyn DatabaseClient>) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealthCheck {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    async fn check(&self) -> Result<(), AppError> {
        self.db_client.health_check().await
    }
}

/// Round trip through the server's own Rosetta API: list the networks,
/// then fetch the status of the first one.
pub struct NetworkHealthCheck {
    client: RosettaHttpClient,
}

impl NetworkHealthCheck {
    pub fn new(client: RosettaHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthCheck for NetworkHealthCheck {
    fn name(&self) -> &'static str {
        "network"
    }

    async fn check(&self) -> Result<(), AppError> {
        let network_list = self.client.network_list().await.map_err(|e| {
            error!(error = %e, "Readiness check, /network/list failed");
            e
        })?;

        let network = network_list
            .network_identifiers
            .into_iter()
            .next()
            .ok_or_else(|| {
                error!("Readiness check, /network/list returned no networks");
                AppError::ExternalService(ExternalServiceError::UnexpectedResponse(
                    "/network/list returned no networks".to_string(),
                ))
            })?;

        self.client.network_status(network).await.map_err(|e| {
            error!(error = %e, "Readiness check, /network/status failed");
            e
        })?;

        Ok(())
    }
}

/// Runs the liveness and readiness probes
pub struct HealthService {
    checks: Vec<Arc<dyn HealthCheck>>,
    timeout: Duration,
}

impl HealthService {
    #[must_use]
    pub fn new(checks: Vec<Arc<dyn HealthCheck>>, timeout: Duration) -> Self {
        Self { checks, timeout }
    }

    /// Names of the readiness checks, in execution order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// The process is up; nothing else is consulted
    pub fn liveness(&self) -> HealthResponse {
        HealthResponse::alive()
    }

    #[instrument(skip(self))]
    pub async fn readiness(&self) -> HealthResponse {
        let mut checks = BTreeMap::new();
        let mut failures = BTreeMap::new();

        for check in &self.checks {
            let name = check.name();
            let outcome = match tokio::time::timeout(self.timeout, check.check()).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("timed out after {}s", self.timeout.as_secs())),
            };

            match outcome {
                Ok(()) => {
                    debug!(check = name, "Readiness check passed");
                    checks.insert(name.to_string(), HealthStatus::Healthy);
                }
                Err(reason) => {
                    error!(check = name, reason = %reason, "Readiness check failed");
                    checks.insert(name.to_string(), HealthStatus::Unhealthy);
                    failures.insert(name.to_string(), reason);
                }
            }
        }

        HealthResponse::new(checks, failures)
    }
}
