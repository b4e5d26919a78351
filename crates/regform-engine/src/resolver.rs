//! Sequential cascade resolution over one chain.

use std::sync::Arc;

use tracing::{debug, warn};

use regform_config::DeploymentConfig;
use regform_data::ReferenceDataStore;
use regform_model::ReferenceDataset;

use crate::chain::{ChainSpec, DatasetView, NodeSpec};
use crate::filter::ConfigFilter;
use crate::store::{FieldPatch, FieldStateStore};

/// Whether resolution proceeds to the next node in the chain.
enum NodeOutcome {
    Continue,
    Stop,
}

/// Drives one dependency chain against the field-state store.
///
/// Resolution is strictly sequential: a node is resolved only after the
/// previous node's store write completed, so downstream candidates are
/// never computed against a value that is about to be cleared. The only
/// suspension points are dataset loads; everything else is synchronous
/// store traffic.
///
/// The resolver never fails: unavailable data and empty candidate sets
/// collapse the affected levels with a warning, and the rest of the
/// form keeps working.
pub struct CascadeResolver {
    chain: ChainSpec,
    store: FieldStateStore,
    data: Arc<ReferenceDataStore>,
    config: DeploymentConfig,
}

impl CascadeResolver {
    /// Configuration is injected per instance; resolvers sharing a page
    /// share only the reference-data store.
    pub fn new(
        chain: ChainSpec,
        store: FieldStateStore,
        data: Arc<ReferenceDataStore>,
        config: DeploymentConfig,
    ) -> Self {
        Self {
            chain,
            store,
            data,
            config,
        }
    }

    pub fn chain(&self) -> &ChainSpec {
        &self.chain
    }

    /// Resolve the whole chain from the root, typically at form
    /// initialization and after a reset.
    pub async fn initialize(&self) {
        self.resolve_from(0).await;
    }

    /// React to a genuine user selection on one of this chain's fields.
    /// Fields outside the chain are ignored.
    pub async fn on_field_changed(&self, field: &str) {
        if let Some(index) = self.chain.position_of_field(field) {
            debug!(chain = self.chain.name(), field, "cascading after value change");
            self.resolve_from(index + 1).await;
        }
    }

    /// Resolve nodes sequentially starting at `start`. Idempotent:
    /// re-running with unchanged ancestor state rewrites nothing and
    /// re-fires no notifications.
    pub async fn resolve_from(&self, start: usize) {
        let mut index = start;
        while index < self.chain.len() {
            match self.resolve_node(index).await {
                NodeOutcome::Continue => index += 1,
                NodeOutcome::Stop => break,
            }
        }
    }

    async fn resolve_node(&self, index: usize) -> NodeOutcome {
        let node = self.chain.node(index);

        // Collapse-on-missing-ancestor: without a complete ancestor
        // path there is nothing to resolve against.
        let mut ancestors = Vec::with_capacity(index);
        for upstream in &self.chain.nodes()[..index] {
            let value = self.store.get(upstream.field()).value;
            if value.is_empty() {
                self.collapse_from(index);
                return NodeOutcome::Stop;
            }
            ancestors.push(value);
        }

        let Some((dataset, view)) = self.load_datasets(node, index).await else {
            self.collapse_from(index);
            return NodeOutcome::Stop;
        };

        let raw = node.candidates(&dataset, &ancestors);
        let filter = ConfigFilter::new(&self.chain, &self.config);
        let candidates = filter.filter_level(index, raw, &ancestors, &view);

        match candidates.len() {
            0 => {
                warn!(
                    chain = self.chain.name(),
                    field = node.field(),
                    "no candidates after filtering, hiding field"
                );
                self.collapse_from(index);
                NodeOutcome::Stop
            }
            1 => {
                // Auto-collapse: a single already-decided option is
                // selected and hidden, never shown as a select.
                let value = candidates[0].value.clone();
                self.store.apply(
                    node.field(),
                    FieldPatch::new()
                        .options(candidates)
                        .value(value)
                        .visible(false)
                        .enabled(true),
                );
                NodeOutcome::Continue
            }
            _ => {
                let current = self.store.get(node.field()).value;
                let retained =
                    !current.is_empty() && candidates.iter().any(|c| c.value == current);
                if retained {
                    self.store.apply(
                        node.field(),
                        FieldPatch::new().options(candidates).visible(true).enabled(true),
                    );
                    NodeOutcome::Continue
                } else {
                    // The selection basis is gone (or was never made):
                    // clear it and every level that depended on it.
                    self.store.apply(
                        node.field(),
                        FieldPatch::new()
                            .options(candidates)
                            .value(String::new())
                            .visible(true)
                            .enabled(true),
                    );
                    self.collapse_from(index + 1);
                    NodeOutcome::Stop
                }
            }
        }
    }

    /// Load the node's dataset plus any datasets an allow-list
    /// back-projection will walk, so filtering stays synchronous.
    async fn load_datasets(
        &self,
        node: &NodeSpec,
        index: usize,
    ) -> Option<(Arc<ReferenceDataset>, DatasetView)> {
        let primary = match self.data.load(node.dataset()).await {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!(
                    chain = self.chain.name(),
                    field = node.field(),
                    error = %err,
                    "reference data unavailable, hiding hierarchy level"
                );
                return None;
            }
        };
        let mut view = DatasetView::new();
        view.insert(node.dataset(), Arc::clone(&primary));

        if self.config.allow_list(node.allow_key()).is_none() {
            let target = (index + 1..self.chain.len()).find(|i| {
                self.config
                    .allow_list(self.chain.node(*i).allow_key())
                    .is_some()
            });
            if let Some(target) = target {
                for i in index + 1..=target {
                    let name = self.chain.node(i).dataset();
                    if view.contains(name) {
                        continue;
                    }
                    match self.data.load(name).await {
                        Ok(dataset) => view.insert(name, dataset),
                        Err(err) => warn!(
                            chain = self.chain.name(),
                            dataset = name,
                            error = %err,
                            "back-projection dataset unavailable, filtering degraded"
                        ),
                    }
                }
            }
        }

        Some((primary, view))
    }

    fn collapse_from(&self, index: usize) {
        for node in &self.chain.nodes()[index..] {
            self.store.apply(node.field(), FieldPatch::collapse());
        }
    }
}
