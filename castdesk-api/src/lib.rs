//! # Castdesk API Server Library
//!
//! Core functionality for the castdesk API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `pagination`: Paginated list envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod pagination;
pub mod routes;
