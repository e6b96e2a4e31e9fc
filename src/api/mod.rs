//! HTTP API module
//!
//! A single trigger endpoint runs the catalog export and reports the result.

pub mod server;
pub mod types;

pub use server::{router, start_server, AppState};
pub use types::{ErrorResponse, ExecuteResponse};
