//! HTTP adapter: handlers, the identity extractor, and error mapping.
//!
//! Handlers live one module per feature area, mirroring the domain services
//! they drive. Route registration happens in `server::configure_api` so the
//! binary and the integration tests share one routing table.

pub mod admin;
pub mod auth;
pub mod error;
pub mod files;
pub mod friends;
pub mod health;
pub mod identity;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod state;
pub mod uploads;
pub mod users;

pub use error::{ApiResult, TRACE_ID_HEADER};
pub use state::HttpState;
