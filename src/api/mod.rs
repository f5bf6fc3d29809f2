//! HTTP API.
//!
//! `api_router()` returns a `Router` that can be mounted on any axum
//! server; `server` owns binding and graceful shutdown.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve_until_ctrl_c, start_api_server, ApiServer, ServerError};
pub use types::ApiContext;
