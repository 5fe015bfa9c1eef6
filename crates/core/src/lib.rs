//! sushisync_core - pure types and functions for the sushisync data layer.
//!
//! Everything in this crate is free of I/O: query keys and invalidation
//! patterns, the per-key cache state machine, filter parsing, the sushi
//! domain model and the transport trait the imperative shell plugs into.

pub mod cache;
pub mod filters;
pub mod overlay;
pub mod serde;
pub mod sushi;
pub mod transport;
