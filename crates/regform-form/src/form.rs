//! One live form instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use regform_config::DeploymentConfig;
use regform_data::ReferenceDataStore;
use regform_engine::{CascadeResolver, FieldPatch, FieldStateStore};

use crate::chains;
use crate::schema::FormSchema;
use crate::validate::{ValidationIssue, validate_required};

/// A single form on a page: its declared fields, its state store, and
/// a resolver per built-in chain the schema covers.
///
/// Instances never share a store; they do share the process-wide
/// reference-data store, so several forms on one page trigger at most
/// one download per dataset.
pub struct FormInstance {
    schema: FormSchema,
    store: FieldStateStore,
    resolvers: Vec<CascadeResolver>,
}

impl FormInstance {
    /// Wire a form over its schema and deployment configuration. A
    /// chain is only driven when the schema declares all of its fields.
    pub fn new(
        schema: FormSchema,
        config: DeploymentConfig,
        data: Arc<ReferenceDataStore>,
    ) -> Self {
        let store = FieldStateStore::new(schema.initial_states());
        let resolvers: Vec<CascadeResolver> =
            [chains::academic_chain(), chains::location_chain()]
                .into_iter()
                .filter(|chain| chain.fields().all(|field| schema.contains(field)))
                .map(|chain| {
                    CascadeResolver::new(
                        chain,
                        store.clone(),
                        Arc::clone(&data),
                        config.clone(),
                    )
                })
                .collect();
        debug!(chains = resolvers.len(), "form instance wired");
        Self {
            schema,
            store,
            resolvers,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// The reactive store rendering adapters subscribe to.
    pub fn store(&self) -> &FieldStateStore {
        &self.store
    }

    /// Resolve every chain from its root. Dataset failures degrade the
    /// affected chain to hidden fields; initialization itself never
    /// fails.
    pub async fn initialize(&self) {
        for resolver in &self.resolvers {
            resolver.initialize().await;
        }
    }

    /// Record a genuine user input and cascade into dependent levels.
    pub async fn set_field_value(&self, field: &str, value: &str) {
        self.store
            .apply(field, FieldPatch::new().value(value).touched(true));
        for resolver in &self.resolvers {
            resolver.on_field_changed(field).await;
        }
    }

    /// Restore every field to its declared initial state, then re-run
    /// initial resolution.
    pub async fn reset(&self) {
        self.store.reset();
        self.initialize().await;
    }

    /// Run the required-field pass, writing per-field errors through
    /// the store. Invisible fields are excluded.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate_required(&self.schema, &self.store)
    }

    /// `{name: value}` for every currently-visible-or-auto-resolved
    /// field, ready for the outbound lead payload.
    pub fn submission_snapshot(&self) -> BTreeMap<String, String> {
        self.store
            .snapshot()
            .into_iter()
            .filter(|(_, state)| state.contributes_to_submission())
            .map(|(name, state)| (name, state.value))
            .collect()
    }
}
