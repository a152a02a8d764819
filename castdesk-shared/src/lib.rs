//! # Castdesk Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the castdesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migration management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the castdesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
