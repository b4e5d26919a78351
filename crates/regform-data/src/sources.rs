//! Ranked URL candidates per dataset.

use std::collections::BTreeMap;

/// Ordered endpoint lists, most-authoritative first.
///
/// A caller-supplied URL can be ranked ahead of the built-in fallbacks
/// with [`SourceRegistry::prepend`]; load attempts walk the list
/// strictly in order.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Vec<String>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the candidate list for a dataset.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        urls: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.sources
            .insert(name.into(), urls.into_iter().map(Into::into).collect());
    }

    /// Rank an extra URL ahead of the existing candidates.
    pub fn prepend(&mut self, name: &str, url: impl Into<String>) {
        self.sources
            .entry(name.to_string())
            .or_default()
            .insert(0, url.into());
    }

    /// The candidate list for a dataset, in attempt order.
    pub fn candidates(&self, name: &str) -> Option<&[String]> {
        self.sources
            .get(name)
            .map(Vec::as_slice)
            .filter(|urls| !urls.is_empty())
    }
}
