//! Rosetta Data API over mirror node ledger state.
//!
//! Layers follow the usual split: `domain` holds the types and conversions,
//! `app` the services and readiness checks, `infra` the Postgres store and the
//! Rosetta HTTP client, and `api` the axum router.

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
