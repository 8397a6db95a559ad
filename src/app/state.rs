//! Application state management.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DatabaseClient, HealthCheck, NetworkConfig};

use super::health::{DEFAULT_CHECK_TIMEOUT, DatabaseHealthCheck, HealthService};
use super::service::RosettaService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RosettaService>,
    pub health: Arc<HealthService>,
}

impl AppState {
    /// Create state whose readiness probe only checks the database
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>, network: NetworkConfig) -> Self {
        let checks: Vec<Arc<dyn HealthCheck>> =
            vec![Arc::new(DatabaseHealthCheck::new(Arc::clone(&db_client)))];
        Self::with_health_checks(db_client, network, checks, DEFAULT_CHECK_TIMEOUT)
    }

    /// Create state with an explicit set of readiness checks
    #[must_use]
    pub fn with_health_checks(
        db_client: Arc<dyn DatabaseClient>,
        network: NetworkConfig,
        checks: Vec<Arc<dyn HealthCheck>>,
        check_timeout: Duration,
    ) -> Self {
        Self {
            service: Arc::new(RosettaService::new(db_client, network)),
            health: Arc::new(HealthService::new(checks, check_timeout)),
        }
    }
}
