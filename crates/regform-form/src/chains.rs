//! The two built-in dependency chains.
//!
//! Accessors tolerate the shapes the reference feeds actually ship:
//! keyed objects for levels/faculties/countries/departments, option
//! arrays either directly on the node or under a wrapper key, and both
//! `Codigo`/`Nombre` and `value`/`label` option spellings.

use serde_json::Value;

use regform_engine::{ChainSpec, NodeSpec};
use regform_model::{Choice, array_choices, keyed_choices, section};

/// Dataset name for academic programs (`programs[level][faculty]`).
pub const PROGRAMS_DATASET: &str = "programs";
/// Dataset name for admission periods (`periods[level]`).
pub const PERIODS_DATASET: &str = "periods";
/// Dataset name for locations (`locations[country][department]`).
pub const LOCATIONS_DATASET: &str = "locations";

/// academic level → faculty → program → admission period.
pub fn academic_chain() -> ChainSpec {
    ChainSpec::new(
        "academic",
        vec![
            NodeSpec::new("academicLevel", PROGRAMS_DATASET, "academicLevel", |ds, _| {
                keyed_choices(ds.root())
            }),
            NodeSpec::new("faculty", PROGRAMS_DATASET, "faculty", |ds, ancestors| {
                ds.at(&[ancestors[0].as_str()])
                    .map(keyed_choices)
                    .unwrap_or_default()
            }),
            NodeSpec::new("program", PROGRAMS_DATASET, "program", |ds, ancestors| {
                ds.at(&[ancestors[0].as_str(), ancestors[1].as_str()])
                    .map(|node| list_in(node, &["Programas", "programs"]))
                    .unwrap_or_default()
            }),
            NodeSpec::new(
                "admissionPeriod",
                PERIODS_DATASET,
                "admissionPeriod",
                |ds, ancestors| {
                    ds.at(&[ancestors[0].as_str()])
                        .map(|node| list_in(node, &["Periodos", "periods"]))
                        .unwrap_or_default()
                },
            ),
        ],
    )
}

/// country → department → city.
pub fn location_chain() -> ChainSpec {
    ChainSpec::new(
        "location",
        vec![
            NodeSpec::new("country", LOCATIONS_DATASET, "country", |ds, _| {
                keyed_choices(ds.root())
            }),
            NodeSpec::new("department", LOCATIONS_DATASET, "department", |ds, ancestors| {
                ds.at(&[ancestors[0].as_str()])
                    .map(|country| keyed_choices(section(country, &["Departamentos", "departments"])))
                    .unwrap_or_default()
            }),
            NodeSpec::new("city", LOCATIONS_DATASET, "city", |ds, ancestors| {
                ds.at(&[ancestors[0].as_str()])
                    .and_then(|country| {
                        section(country, &["Departamentos", "departments"])
                            .get(&ancestors[1])
                    })
                    .map(|department| list_in(department, &["Ciudades", "cities"]))
                    .unwrap_or_default()
            }),
        ],
    )
}

/// Options either directly as an array or under one of the wrapper keys.
fn list_in(value: &Value, names: &[&str]) -> Vec<Choice> {
    if value.is_array() {
        array_choices(value)
    } else {
        array_choices(section(value, names))
    }
}
