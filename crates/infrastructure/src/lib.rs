//! Purse Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod auth;
pub mod client;
pub mod config;
pub mod http;
pub mod persistence;

pub use auth::HttpTokenRefresher;
pub use client::PurseClient;
pub use config::{ClientConfig, ConfigError};
pub use http::ReqwestTransport;
pub use persistence::FileCredentialStore;
