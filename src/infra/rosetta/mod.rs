//! Clients for Rosetta API servers.

pub mod client;

pub use client::RosettaHttpClient;
