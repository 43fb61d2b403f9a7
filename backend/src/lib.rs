//! Desktop-metaphor forum backend.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, ports,
//! and services; [`inbound`] adapts HTTP onto the services; [`outbound`]
//! implements the ports against MongoDB, the local disk, and in-memory
//! stores; [`server`] assembles an application from a [`config::Config`].

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
