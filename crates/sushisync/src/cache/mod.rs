//! Cache store, subscriptions and the background sweeper.
//!
//! The per-entry state machine lives in `sushisync_core::cache`; this module
//! owns the entries and applies transitions under a lock.

mod store;
mod subscription;
mod sweeper;

pub use store::{CacheStore, FetchTicket};
pub use subscription::Subscription;
pub use sweeper::spawn_sweeper;
