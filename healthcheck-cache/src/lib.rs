//! Client-side caching for the Health Check app.
//!
//! Mirrors what the browser build does with `localStorage`: values are stored
//! as JSON blobs of the form `{ "value": ..., "expiry": <epoch millis> }` and
//! a blob read after its expiry is treated as absent and removed.
//!
//! # Components
//!
//! - [`KeyValueStore`]: the synchronous string store (memory or file backed)
//! - [`Clock`]: time source, swappable for a [`ManualClock`] in tests
//! - [`BlobCache`]: namespaced, typed TTL access on top of both

mod blob;
mod clock;
mod error;
mod store;

pub use blob::{BlobCache, CachedBlob};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, CacheResult};
pub use store::{FileStore, KeyValueStore, MemoryStore};
