//! Transport implementations.
//!
//! The HTTP client lives in `sushisync_client`; this crate only ships the
//! in-memory backend.

mod inmemory;

pub use inmemory::InMemoryTransport;
pub use sushisync_core::transport::SushiTransport;
