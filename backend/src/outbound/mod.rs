//! Outbound adapters implementing the domain ports.
//!
//! [`persistence`] maps the ports onto MongoDB collections, [`storage`] onto
//! the local filesystem, and [`memory`] onto in-process maps for tests and
//! the no-database dev fallback.

pub mod memory;
pub mod persistence;
pub mod storage;
