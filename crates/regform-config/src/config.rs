//! Deployment configuration parsing and allow-list lookup.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A list of offered codes for one hierarchy node.
///
/// Hosting pages send either bare code arrays (`["P1", "P2"]`) or
/// arrays of objects (`[{"code": "P1"}]`, upstream spelling
/// `[{"Codigo": "P1"}]`); both deserialize into the same list. An empty
/// list means "no restriction for this node".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeList(Vec<String>);

impl CodeList {
    pub fn new(codes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(codes.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CodeList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CodeEntry {
            Bare(String),
            Keyed {
                #[serde(alias = "Codigo")]
                code: String,
            },
        }

        let entries = Vec::<CodeEntry>::deserialize(deserializer)?;
        Ok(Self(
            entries
                .into_iter()
                .map(|entry| match entry {
                    CodeEntry::Bare(code) | CodeEntry::Keyed { code } => code,
                })
                .collect(),
        ))
    }
}

/// What one deployment actually offers, as supplied by the hosting page.
///
/// Absent keys mean no restriction. Lists may restrict a node directly
/// (`faculties`) or only a deeper node (`programs`), in which case the
/// cascade filter back-projects the restriction onto upstream levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub academic_levels: CodeList,
    pub faculties: CodeList,
    pub programs: CodeList,
    pub admission_periods: CodeList,
    pub countries: CodeList,
    pub departments: CodeList,
    pub cities: CodeList,
}

impl DeploymentConfig {
    /// Parse the configuration object a hosting page provides.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The allow-list for a hierarchy node, or `None` when the node is
    /// unrestricted (unknown node names are unrestricted by definition).
    pub fn allow_list(&self, node: &str) -> Option<&[String]> {
        let list = match node {
            "academicLevel" => &self.academic_levels,
            "faculty" => &self.faculties,
            "program" => &self.programs,
            "admissionPeriod" => &self.admission_periods,
            "country" => &self.countries,
            "department" => &self.departments,
            "city" => &self.cities,
            _ => return None,
        };
        if list.is_empty() {
            None
        } else {
            Some(list.codes())
        }
    }
}
