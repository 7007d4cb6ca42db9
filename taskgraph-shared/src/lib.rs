//! # TaskGraph Shared Library
//!
//! This crate contains the domain types and business logic shared by the
//! TaskGraph GraphQL API server.
//!
//! ## Module Organization
//!
//! - `models`: Document models and GraphQL input types
//! - `auth`: Identity context, authorization guards, and password handling
//! - `store`: Ownership-scoped MongoDB collection access and relation loaders
//! - `error`: Common domain error type

pub mod auth;
pub mod error;
pub mod models;
pub mod store;

/// Current version of the TaskGraph shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
