//! Cascade resolution behavior over fixture hierarchies.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use regform_config::DeploymentConfig;
use regform_data::{DataError, Fetch, ReferenceDataStore};
use regform_engine::{CascadeResolver, ChainSpec, FieldStateStore, NodeSpec};
use regform_model::{FieldState, array_choices, keyed_choices};

/// Serves one canned JSON document per dataset URL.
struct FakeFetch {
    responses: HashMap<String, Value>,
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn fetch_json(&self, url: &str) -> regform_data::Result<Value> {
        self.responses.get(url).cloned().ok_or_else(|| DataError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn data_store(datasets: impl IntoIterator<Item = (&'static str, Value)>) -> Arc<ReferenceDataStore> {
    let mut responses = HashMap::new();
    let mut builder = ReferenceDataStore::builder();
    for (name, value) in datasets {
        let url = format!("https://test.local/{name}.json");
        builder = builder.source(name, [url.clone()]);
        responses.insert(url, value);
    }
    builder
        .fetcher(Arc::new(FakeFetch { responses }))
        .build()
        .expect("build store")
}

/// academic level → faculty → program, all over the `programs` dataset.
fn academic_chain() -> ChainSpec {
    ChainSpec::new(
        "academic",
        vec![
            NodeSpec::new("academicLevel", "programs", "academicLevel", |ds, _| {
                keyed_choices(ds.root())
            }),
            NodeSpec::new("faculty", "programs", "faculty", |ds, ancestors| {
                ds.at(&[ancestors[0].as_str()])
                    .map(keyed_choices)
                    .unwrap_or_default()
            }),
            NodeSpec::new("program", "programs", "program", |ds, ancestors| {
                ds.at(&[ancestors[0].as_str(), ancestors[1].as_str(), "Programas"])
                    .map(array_choices)
                    .unwrap_or_default()
            }),
        ],
    )
}

fn chain_store() -> FieldStateStore {
    FieldStateStore::new(
        ["academicLevel", "faculty", "program"]
            .into_iter()
            .map(|name| (name.to_string(), FieldState::cascaded())),
    )
}

fn resolver_with(
    datasets: impl IntoIterator<Item = (&'static str, Value)>,
    config: Value,
) -> (CascadeResolver, FieldStateStore) {
    let store = chain_store();
    let resolver = CascadeResolver::new(
        academic_chain(),
        store.clone(),
        data_store(datasets),
        DeploymentConfig::from_json(config).expect("parse config"),
    );
    (resolver, store)
}

/// One level key, one faculty key, three programs: the two singleton
/// levels auto-collapse and only the program select is shown.
#[tokio::test]
async fn singleton_levels_auto_collapse() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": { "ENG": { "Programas": [
                    { "Codigo": "P1", "Nombre": "CS" },
                    { "Codigo": "P2", "Nombre": "Math" },
                    { "Codigo": "P3", "Nombre": "Physics" }
                ] } }
            }),
        )],
        json!({}),
    );

    resolver.initialize().await;

    let level = store.get("academicLevel");
    assert!(!level.visible);
    assert_eq!(level.value, "PREG");

    let faculty = store.get("faculty");
    assert!(!faculty.visible);
    assert_eq!(faculty.value, "ENG");

    let program = store.get("program");
    assert!(program.visible);
    assert!(program.enabled);
    assert!(program.value.is_empty());
    assert_eq!(program.options.len(), 3);
}

/// No field is ever left visible with fewer than two options.
#[tokio::test]
async fn no_visible_field_holds_a_decided_option_set() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": { "ENG": { "Programas": [ { "Codigo": "P1", "Nombre": "CS" } ] } }
            }),
        )],
        json!({}),
    );

    resolver.initialize().await;

    for (name, state) in store.snapshot() {
        assert!(
            !state.visible || state.options.len() >= 2,
            "field '{name}' is visible with {} option(s)",
            state.options.len()
        );
    }
}

#[tokio::test]
async fn resolution_is_idempotent() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": { "ENG": { "Programas": [
                    { "Codigo": "P1", "Nombre": "CS" },
                    { "Codigo": "P2", "Nombre": "Math" }
                ] } }
            }),
        )],
        json!({}),
    );

    resolver.initialize().await;
    let first_pass = store.snapshot();

    let notifications = Rc::new(RefCell::new(0));
    let notifications_by_cb = Rc::clone(&notifications);
    store.subscribe(None, move |_| *notifications_by_cb.borrow_mut() += 1);

    resolver.initialize().await;
    assert_eq!(store.snapshot(), first_pass);
    assert_eq!(*notifications.borrow(), 0, "second pass re-fired notifications");
}

/// Changing an ancestor to a branch where the old selection does not
/// exist clears the selection and collapses every descendant.
#[tokio::test]
async fn ancestor_change_cascade_clears_descendants() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": {
                    "ENG": { "Programas": [ { "Codigo": "P1" }, { "Codigo": "P2" } ] },
                    "SCI": { "Programas": [ { "Codigo": "P3" }, { "Codigo": "P4" } ] }
                },
                "POSG": {
                    "BUS": { "Programas": [ { "Codigo": "M1" }, { "Codigo": "M2" } ] },
                    "MED": { "Programas": [ { "Codigo": "M3" }, { "Codigo": "M4" } ] }
                }
            }),
        )],
        json!({}),
    );

    resolver.initialize().await;
    assert_eq!(store.get("academicLevel").options.len(), 2);

    store.set_value("academicLevel", "PREG");
    resolver.on_field_changed("academicLevel").await;
    assert_eq!(store.get("faculty").options.len(), 2);

    store.set_value("faculty", "ENG");
    resolver.on_field_changed("faculty").await;
    assert!(store.get("program").visible);
    store.set_value("program", "P1");

    store.set_value("academicLevel", "POSG");
    resolver.on_field_changed("academicLevel").await;

    let faculty = store.get("faculty");
    assert!(faculty.visible);
    assert!(faculty.value.is_empty(), "stale faculty value survived");
    assert!(faculty.has_option("BUS"));

    let program = store.get("program");
    assert!(!program.visible);
    assert!(program.value.is_empty());
    assert!(program.options.is_empty());
}

/// A retained selection keeps its descendants resolved when the
/// ancestor is re-resolved without changing.
#[tokio::test]
async fn retained_selection_survives_re_resolution() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": {
                    "ENG": { "Programas": [ { "Codigo": "P1" }, { "Codigo": "P2" } ] },
                    "SCI": { "Programas": [ { "Codigo": "P3" }, { "Codigo": "P4" } ] }
                },
                "POSG": {
                    "ENG": { "Programas": [ { "Codigo": "M1" }, { "Codigo": "M2" } ] },
                    "BUS": { "Programas": [ { "Codigo": "M3" }, { "Codigo": "M4" } ] }
                }
            }),
        )],
        json!({}),
    );

    resolver.initialize().await;
    store.set_value("academicLevel", "PREG");
    resolver.on_field_changed("academicLevel").await;
    store.set_value("faculty", "ENG");
    resolver.on_field_changed("faculty").await;

    // ENG also exists under POSG: the faculty selection is retained and
    // the program level is recomputed for the new branch.
    store.set_value("academicLevel", "POSG");
    resolver.on_field_changed("academicLevel").await;

    let faculty = store.get("faculty");
    assert_eq!(faculty.value, "ENG");
    let program = store.get("program");
    assert!(program.visible);
    assert!(program.has_option("M1"));
    assert!(!program.has_option("P1"));
}

/// An allow-list that matches nothing hides the whole chain; this is an
/// admissible deployment edge case, not an error.
#[tokio::test]
async fn empty_filter_result_hides_the_level() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": { "ENG": { "Programas": [ { "Codigo": "P1" } ] } }
            }),
        )],
        json!({ "programs": ["UNKNOWN"] }),
    );

    resolver.initialize().await;

    for (name, state) in store.snapshot() {
        assert!(!state.visible, "field '{name}' should be hidden");
        assert!(state.value.is_empty());
    }
}

/// Unavailable reference data degrades the chain to hidden fields; it
/// never fails form initialization.
#[tokio::test]
async fn unavailable_data_collapses_the_chain() {
    let (resolver, store) = resolver_with([], json!({}));

    resolver.initialize().await;

    for (_, state) in store.snapshot() {
        assert!(!state.visible);
        assert!(!state.enabled);
        assert!(state.value.is_empty());
    }
}

/// Clearing an upstream selection collapses everything below it.
#[tokio::test]
async fn cleared_ancestor_collapses_descendants() {
    let (resolver, store) = resolver_with(
        [(
            "programs",
            json!({
                "PREG": {
                    "ENG": { "Programas": [ { "Codigo": "P1" }, { "Codigo": "P2" } ] },
                    "SCI": { "Programas": [ { "Codigo": "P3" } ] }
                },
                "POSG": {
                    "BUS": { "Programas": [ { "Codigo": "M1" } ] }
                }
            }),
        )],
        json!({}),
    );

    resolver.initialize().await;
    store.set_value("academicLevel", "PREG");
    resolver.on_field_changed("academicLevel").await;
    assert!(store.get("faculty").visible);

    store.set_value("academicLevel", "");
    resolver.on_field_changed("academicLevel").await;

    let faculty = store.get("faculty");
    assert!(!faculty.visible);
    assert!(faculty.options.is_empty());
    assert!(!store.get("program").visible);
}
