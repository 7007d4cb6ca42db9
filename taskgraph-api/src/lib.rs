//! # TaskGraph API Server Library
//!
//! This library provides the core functionality for the TaskGraph API
//! server: a session-authenticated GraphQL endpoint over the shared
//! MongoDB storage layer.
//!
//! ## Modules
//!
//! - `app`: Application state, router, and GraphQL request plumbing
//! - `config`: Configuration management
//! - `schema`: GraphQL schema roots and resolvers

pub mod app;
pub mod config;
pub mod schema;
