//! sushisync - client-side data synchronization for the sushi menu.
//!
//! The imperative shell around `sushisync_core`: a keyed request cache with
//! subscriptions, a fetch executor with cancellation and retries, mutation
//! coordination, overlay slots and filter/location synchronization, all
//! owned by one [`SyncContext`].

pub mod cache;
pub mod config;
pub mod context;
pub mod debounce;
pub mod executor;
pub mod filters;
pub mod location;
pub mod mutation;
pub mod overlay;
pub mod queries;
pub mod transport;

pub use cache::{CacheStore, FetchTicket, Subscription};
pub use config::SyncConfig;
pub use context::SyncContext;
pub use debounce::DebounceBuffer;
pub use executor::{fetcher, FetchFuture, Fetcher, RequestExecutor};
pub use filters::{CommitOptions, FilterSynchronizer};
pub use location::{Location, MemoryLocation, WriteMode};
pub use mutation::{Mutation, MutationCoordinator, MutationError, Notification, NotificationKind};
pub use overlay::OverlayStore;
pub use queries::ListObserver;
pub use transport::{InMemoryTransport, SushiTransport};
