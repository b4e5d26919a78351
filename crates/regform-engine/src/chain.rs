//! Declarative description of one dependency chain.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regform_model::{Choice, ReferenceDataset};

/// Computes a node's raw candidates from its dataset and the values of
/// every ancestor node, in chain order.
pub type ChoiceAccessor = Box<dyn Fn(&ReferenceDataset, &[String]) -> Vec<Choice>>;

/// One level of a dependency chain.
pub struct NodeSpec {
    field: String,
    dataset: String,
    allow_key: String,
    accessor: ChoiceAccessor,
}

impl NodeSpec {
    /// `field` is the store field this node drives, `dataset` the
    /// reference dataset it reads, and `allow_key` the node name under
    /// which a deployment config may restrict it.
    pub fn new(
        field: impl Into<String>,
        dataset: impl Into<String>,
        allow_key: impl Into<String>,
        accessor: impl Fn(&ReferenceDataset, &[String]) -> Vec<Choice> + 'static,
    ) -> Self {
        Self {
            field: field.into(),
            dataset: dataset.into(),
            allow_key: allow_key.into(),
            accessor: Box::new(accessor),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn allow_key(&self) -> &str {
        &self.allow_key
    }

    /// Raw candidates for this node, order preserved from the dataset.
    pub fn candidates(&self, dataset: &ReferenceDataset, ancestors: &[String]) -> Vec<Choice> {
        (self.accessor)(dataset, ancestors)
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("field", &self.field)
            .field("dataset", &self.dataset)
            .field("allow_key", &self.allow_key)
            .finish_non_exhaustive()
    }
}

/// An ordered dependency chain (for example academic level → faculty →
/// program → admission period). The dependency graph is fixed per
/// deployment; chains are built once at form construction.
#[derive(Debug)]
pub struct ChainSpec {
    name: String,
    nodes: Vec<NodeSpec>,
}

impl ChainSpec {
    pub fn new(name: impl Into<String>, nodes: Vec<NodeSpec>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &NodeSpec {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Index of the node driving `field`, if this chain owns it.
    pub fn position_of_field(&self, field: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.field == field)
    }

    /// Field names this chain drives, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.field.as_str())
    }
}

/// Synchronous read access to the datasets one resolution pass needs.
///
/// The resolver populates the view from the shared data store before
/// filtering, so candidate computation and back-projection never block.
#[derive(Debug, Default)]
pub struct DatasetView {
    datasets: BTreeMap<String, Arc<ReferenceDataset>>,
}

impl DatasetView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, dataset: Arc<ReferenceDataset>) {
        self.datasets.insert(name.to_string(), dataset);
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceDataset> {
        self.datasets.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }
}
