//! # Metrica Shared Library
//!
//! This crate contains the types and business logic shared by the Metrica
//! API server: database models, authentication utilities, and CSV
//! ingestion parsing.
//!
//! ## Module Organization
//!
//! - `models`: Database models and bulk-insert operations
//! - `auth`: Password hashing and JWT session tokens
//! - `db`: Connection pool and migration runner
//! - `ingest`: CSV upload parsing and column validation

pub mod auth;
pub mod db;
pub mod ingest;
pub mod models;

/// Current version of the Metrica shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
