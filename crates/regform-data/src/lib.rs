//! Reference-data loading for the registration-form engine.
//!
//! [`ReferenceDataStore`] loads hierarchical reference datasets
//! (locations, academic programs, admission periods, phone prefixes)
//! from a ranked list of HTTP endpoints, caches them with a configurable
//! TTL, and deduplicates in-flight requests so that any number of form
//! instances on one page trigger at most one fetch per dataset.
//!
//! The store is shared process-wide (`Arc`); datasets are immutable once
//! loaded and handed out as `Arc<ReferenceDataset>`. Transport sits
//! behind the [`Fetch`] trait so the loading pipeline is testable
//! without a network, and persistence behind [`CacheStore`] so the cache
//! backend is swappable.

mod cache;
mod error;
mod fetch;
mod sources;
mod store;

pub use cache::{CacheEntry, CacheStore, DEFAULT_TTL_HOURS, FileCacheStore, MemoryCacheStore};
pub use error::{DataError, Result};
pub use fetch::{Fetch, HttpFetch};
pub use sources::SourceRegistry;
pub use store::{ReferenceDataStore, ReferenceDataStoreBuilder};
