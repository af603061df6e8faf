//! # stockroom-server: HTTP API for Stockroom
//!
//! A thin translation layer: typed request structs in, the success or error
//! envelope out. Every business rule and transaction lives in
//! `stockroom-core` / `stockroom-db`.
//!
//! ## Module Organization
//!
//! - [`config`] - `ServerConfig` (defaults, TOML file, `STOCKROOM_*` env)
//! - [`error`] - `ApiError` and its HTTP mapping
//! - [`state`] - Shared handler state
//! - [`routes`] - Handlers and the router

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
