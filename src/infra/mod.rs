//! Infrastructure layer implementations.

pub mod database;
pub mod rosetta;

pub use database::{PostgresClient, PostgresConfig};
pub use rosetta::RosettaHttpClient;
