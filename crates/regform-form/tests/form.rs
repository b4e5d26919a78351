//! End-to-end form behavior over the built-in chains.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use regform_config::DeploymentConfig;
use regform_data::{DataError, Fetch, ReferenceDataStore};
use regform_form::{FormInstance, FormSchema};

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

fn single_program_datasets() -> Vec<(&'static str, Value)> {
    vec![
        (
            "programs",
            json!({ "PREG": { "ENG": { "Programas": [ { "Codigo": "P1", "Nombre": "CS" } ] } } }),
        ),
        (
            "periods",
            json!({ "PREG": [ { "Codigo": "2026-1" }, { "Codigo": "2026-2" } ] }),
        ),
        (
            "locations",
            json!({
                "CO": {
                    "Nombre": "Colombia",
                    "Departamentos": {
                        "ANT": { "Nombre": "Antioquia", "Ciudades": [ "Medellín", "Envigado" ] },
                        "CUN": { "Nombre": "Cundinamarca", "Ciudades": [ "Bogotá", "Chía" ] }
                    }
                },
                "EC": {
                    "Nombre": "Ecuador",
                    "Departamentos": {
                        "PIC": { "Nombre": "Pichincha", "Ciudades": [ "Quito" ] }
                    }
                }
            }),
        ),
    ]
}

/// The whole academic branch is decided by `programs: ["P1"]`: every
/// level auto-collapses and only the admission period is offered.
#[tokio::test]
async fn program_allow_list_decides_the_academic_branch() {
    let form = FormInstance::new(
        FormSchema::standard(),
        DeploymentConfig::from_json(json!({ "programs": ["P1"] })).unwrap(),
        data_store(single_program_datasets()),
    );
    form.initialize().await;

    let store = form.store();
    for (field, expected) in [
        ("academicLevel", "PREG"),
        ("faculty", "ENG"),
        ("program", "P1"),
    ] {
        let state = store.get(field);
        assert!(!state.visible, "'{field}' should be auto-collapsed");
        assert_eq!(state.value, expected);
    }

    let period = store.get("admissionPeriod");
    assert!(period.visible);
    assert!(period.enabled);
    assert_eq!(period.options.len(), 2);
    assert!(period.value.is_empty());
}

/// The location chain runs independently of the academic chain.
#[tokio::test]
async fn location_chain_resolves_alongside_the_academic_chain() {
    let form = FormInstance::new(
        FormSchema::standard(),
        DeploymentConfig::default(),
        data_store(single_program_datasets()),
    );
    form.initialize().await;

    let store = form.store();
    let country = store.get("country");
    assert!(country.visible);
    assert_eq!(country.options.len(), 2);

    form.set_field_value("country", "CO").await;
    let department = store.get("department");
    assert!(department.visible);
    assert_eq!(department.options.len(), 2);

    form.set_field_value("department", "ANT").await;
    let city = store.get("city");
    assert!(city.visible);
    assert!(city.has_option("Medellín"));

    // A single-department country collapses straight through to cities.
    form.set_field_value("country", "EC").await;
    let department = store.get("department");
    assert!(!department.visible);
    assert_eq!(department.value, "PIC");
    let city = store.get("city");
    assert!(!city.visible, "single city should auto-collapse");
    assert_eq!(city.value, "Quito");
}

/// Visible fields and auto-resolved hidden fields reach the payload;
/// collapsed levels do not.
#[tokio::test]
async fn submission_snapshot_covers_visible_and_auto_resolved_fields() {
    let form = FormInstance::new(
        FormSchema::standard(),
        DeploymentConfig::from_json(json!({ "programs": ["P1"] })).unwrap(),
        data_store(single_program_datasets()),
    );
    form.initialize().await;
    form.set_field_value("email", "ada@example.edu").await;
    form.set_field_value("admissionPeriod", "2026-1").await;

    let snapshot = form.submission_snapshot();
    assert_eq!(snapshot["email"], "ada@example.edu");
    assert_eq!(snapshot["academicLevel"], "PREG");
    assert_eq!(snapshot["faculty"], "ENG");
    assert_eq!(snapshot["program"], "P1");
    assert_eq!(snapshot["admissionPeriod"], "2026-1");
    // Hidden and unresolved: not part of the payload.
    assert!(!snapshot.contains_key("department"));
}

/// A missing dataset hides its chain but leaves the rest of the form
/// fully usable.
#[tokio::test]
async fn missing_locations_dataset_degrades_only_that_chain() {
    let datasets = single_program_datasets()
        .into_iter()
        .filter(|(name, _)| *name != "locations")
        .collect::<Vec<_>>();
    let form = FormInstance::new(
        FormSchema::standard(),
        DeploymentConfig::from_json(json!({ "programs": ["P1"] })).unwrap(),
        data_store(datasets),
    );
    form.initialize().await;

    let store = form.store();
    assert!(!store.get("country").visible);
    assert!(!store.get("city").visible);
    assert!(store.get("admissionPeriod").visible);
    assert!(store.get("email").visible);
}

#[tokio::test]
async fn validation_skips_what_the_cascade_hid() {
    let form = FormInstance::new(
        FormSchema::standard(),
        DeploymentConfig::from_json(json!({ "programs": ["P1"] })).unwrap(),
        data_store(single_program_datasets()),
    );
    form.initialize().await;

    let issues = form.validate();
    let flagged: Vec<&str> = issues.iter().map(|issue| issue.field.as_str()).collect();
    assert!(flagged.contains(&"email"));
    // Auto-collapsed academic fields never block submission.
    assert!(!flagged.contains(&"academicLevel"));

    form.set_field_value("firstName", "Ada").await;
    form.set_field_value("lastName", "Lovelace").await;
    form.set_field_value("email", "ada@example.edu").await;
    form.set_field_value("attendeeType", "applicant").await;
    assert!(form.validate().is_empty());
}

#[tokio::test]
async fn reset_restores_and_re_resolves() {
    let form = FormInstance::new(
        FormSchema::standard(),
        DeploymentConfig::from_json(json!({ "programs": ["P1"] })).unwrap(),
        data_store(single_program_datasets()),
    );
    form.initialize().await;
    form.set_field_value("email", "ada@example.edu").await;
    form.set_field_value("admissionPeriod", "2026-1").await;

    form.reset().await;

    let store = form.store();
    assert!(store.get("email").value.is_empty());
    assert!(!store.get("email").touched);
    // Auto-resolution runs again after the reset.
    assert_eq!(store.get("program").value, "P1");
    let period = store.get("admissionPeriod");
    assert!(period.value.is_empty());
    assert_eq!(period.options.len(), 2);
}
