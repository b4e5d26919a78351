//! Built-in dataset endpoints.

use regform_data::ReferenceDataStoreBuilder;

use crate::chains::{LOCATIONS_DATASET, PERIODS_DATASET, PROGRAMS_DATASET};

/// Phone-prefix dataset consumed by the contact widgets.
pub const PREFIXES_DATASET: &str = "prefixes";

/// Built-in fallback endpoints per dataset, most-authoritative first.
/// Deployments rank their own endpoint ahead of these with
/// [`ReferenceDataStoreBuilder::prepend_url`].
const DEFAULT_SOURCES: &[(&str, &[&str])] = &[
    (
        PROGRAMS_DATASET,
        &[
            "https://registro.example.edu/datos/programas.json",
            "https://cdn.example.edu/forms/programas.json",
        ],
    ),
    (
        PERIODS_DATASET,
        &[
            "https://registro.example.edu/datos/periodos.json",
            "https://cdn.example.edu/forms/periodos.json",
        ],
    ),
    (
        LOCATIONS_DATASET,
        &[
            "https://registro.example.edu/datos/ubicaciones.json",
            "https://cdn.example.edu/forms/ubicaciones.json",
        ],
    ),
    (
        PREFIXES_DATASET,
        &[
            "https://registro.example.edu/datos/prefijos.json",
            "https://cdn.example.edu/forms/prefijos.json",
        ],
    ),
];

/// A data-store builder preloaded with the built-in endpoints.
pub fn builder_with_defaults() -> ReferenceDataStoreBuilder {
    let mut builder = ReferenceDataStoreBuilder::default();
    for (name, urls) in DEFAULT_SOURCES {
        builder = builder.source(*name, urls.iter().copied());
    }
    builder
}
