//! The process-wide reference-data store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::{debug, warn};

use regform_model::ReferenceDataset;

use crate::cache::{CACHE_KEY_PREFIX, CacheEntry, CacheStore, DEFAULT_TTL_HOURS};
use crate::error::{DataError, Result};
use crate::fetch::{Fetch, HttpFetch};
use crate::sources::SourceRegistry;

/// A pending load, shareable by every caller asking for the same dataset.
type SharedLoad = Shared<BoxFuture<'static, Result<Arc<ReferenceDataset>>>>;

/// Builder for [`ReferenceDataStore`].
#[derive(Default)]
pub struct ReferenceDataStoreBuilder {
    sources: SourceRegistry,
    fetcher: Option<Arc<dyn Fetch>>,
    cache: Option<Arc<dyn CacheStore>>,
    ttl_hours: i64,
}

impl ReferenceDataStoreBuilder {
    /// Register the ranked URL candidates for a dataset.
    #[must_use]
    pub fn source(
        mut self,
        name: impl Into<String>,
        urls: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.sources.register(name, urls);
        self
    }

    /// Rank a caller-supplied URL ahead of the registered candidates.
    #[must_use]
    pub fn prepend_url(mut self, name: &str, url: impl Into<String>) -> Self {
        self.sources.prepend(name, url);
        self
    }

    /// Replace the transport (tests substitute fakes here).
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Enable caching through the given backend. Without this call the
    /// store never reads or writes a cache.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Cache TTL in hours. Defaults to [`DEFAULT_TTL_HOURS`].
    #[must_use]
    pub fn ttl_hours(mut self, hours: i64) -> Self {
        self.ttl_hours = hours;
        self
    }

    /// Build the shared store. Fails only if the default HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<Arc<ReferenceDataStore>> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetch::new()?),
        };
        let ttl_hours = if self.ttl_hours > 0 {
            self.ttl_hours
        } else {
            DEFAULT_TTL_HOURS
        };
        Ok(Arc::new(ReferenceDataStore {
            fetcher,
            cache: self.cache,
            ttl_hours,
            sources: self.sources,
            state: Mutex::new(StoreState::default()),
        }))
    }
}

#[derive(Default)]
struct StoreState {
    datasets: HashMap<String, Arc<ReferenceDataset>>,
    in_flight: HashMap<String, SharedLoad>,
}

/// Loads and caches hierarchical reference datasets.
///
/// One store is shared by every form instance in the process. A load
/// checks, in order: the in-memory dataset map, the in-flight request
/// registry (joining any pending load instead of issuing a duplicate),
/// the expiring cache, and finally the ranked URL candidates. Fetches
/// run as detached tasks, so a caller that goes away does not cancel a
/// request whose result would still benefit other instances.
pub struct ReferenceDataStore {
    fetcher: Arc<dyn Fetch>,
    cache: Option<Arc<dyn CacheStore>>,
    ttl_hours: i64,
    sources: SourceRegistry,
    state: Mutex<StoreState>,
}

impl ReferenceDataStore {
    pub fn builder() -> ReferenceDataStoreBuilder {
        ReferenceDataStoreBuilder::default()
    }

    /// The dataset, if already loaded. Synchronous and side-effect-free.
    pub fn get(&self, name: &str) -> Option<Arc<ReferenceDataset>> {
        self.state.lock().unwrap().datasets.get(name).cloned()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.state.lock().unwrap().datasets.contains_key(name)
    }

    /// Load a dataset, deduplicating concurrent requests.
    ///
    /// Rejection is recoverable: callers degrade the dependent form
    /// section and continue initializing the rest of the form.
    pub async fn load(self: &Arc<Self>, name: &str) -> Result<Arc<ReferenceDataset>> {
        let shared = {
            let mut state = self.state.lock().unwrap();
            if let Some(dataset) = state.datasets.get(name) {
                return Ok(Arc::clone(dataset));
            }
            match state.in_flight.get(name).cloned() {
                Some(pending) => {
                    debug!(dataset = name, "joining in-flight load");
                    pending
                }
                None => {
                    let task =
                        tokio::spawn(Self::fetch_and_install(Arc::clone(self), name.to_string()));
                    let task_name = name.to_string();
                    let shared: SharedLoad = async move {
                        match task.await {
                            Ok(result) => result,
                            Err(err) => Err(DataError::TaskFailed {
                                name: task_name,
                                message: err.to_string(),
                            }),
                        }
                    }
                    .boxed()
                    .shared();
                    state.in_flight.insert(name.to_string(), shared.clone());
                    shared
                }
            }
        };
        shared.await
    }

    /// Drop the in-memory and cached copies, then fetch fresh.
    pub async fn reload(self: &Arc<Self>, name: &str) -> Result<Arc<ReferenceDataset>> {
        self.state.lock().unwrap().datasets.remove(name);
        if let Some(cache) = &self.cache {
            cache.remove(&cache_key(name));
        }
        self.load(name).await
    }

    /// Runs detached: completes (and populates the shared state) even
    /// when every original caller has gone away.
    async fn fetch_and_install(store: Arc<Self>, name: String) -> Result<Arc<ReferenceDataset>> {
        let result = store.fetch_dataset(&name).await;
        let mut state = store.state.lock().unwrap();
        if let Ok(dataset) = &result {
            state.datasets.insert(name.clone(), Arc::clone(dataset));
        }
        state.in_flight.remove(&name);
        result
    }

    async fn fetch_dataset(&self, name: &str) -> Result<Arc<ReferenceDataset>> {
        if let Some(cache) = &self.cache {
            if let Some(entry) = cache.get(&cache_key(name)) {
                if entry.is_expired(self.ttl_hours) {
                    debug!(dataset = name, "cache entry expired, fetching fresh");
                } else {
                    debug!(dataset = name, "serving dataset from cache");
                    return Ok(Arc::new(ReferenceDataset::new(entry.data)));
                }
            }
        }

        let urls = self
            .sources
            .candidates(name)
            .ok_or_else(|| DataError::UnknownDataset(name.to_string()))?;

        let mut attempts = 0;
        for url in urls {
            attempts += 1;
            match self.fetcher.fetch_json(url).await {
                Ok(data) => {
                    debug!(dataset = name, url = %url, "dataset fetched");
                    if let Some(cache) = &self.cache {
                        cache.put(&cache_key(name), &CacheEntry::new(data.clone()));
                    }
                    return Ok(Arc::new(ReferenceDataset::new(data)));
                }
                Err(err) => {
                    warn!(dataset = name, url = %url, error = %err,
                        "candidate URL failed, trying next");
                }
            }
        }

        Err(DataError::Unavailable {
            name: name.to_string(),
            attempts,
        })
    }
}

fn cache_key(name: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{name}")
}
