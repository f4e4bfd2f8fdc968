//! HTTP surface: embedded pages plus the JSON endpoints under `/api/`
//! that the form page drives.
//!
//! The router is composable — `form_router()` returns a `Router` that
//! can be mounted on any axum server instance; `server::start()` runs
//! it with a graceful-shutdown handle.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::form_router;
pub use server::FormServer;
pub use types::ApiContext;
