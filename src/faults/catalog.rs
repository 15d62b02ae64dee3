//! Compiled-in scenario catalog and its integrity checks.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::types::FaultScenario;

/// Catalog source shipped with the crate.
const BUILTIN_TOML: &str = include_str!("../../data/fault_scenarios.toml");

/// Failure to load a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// An integrity problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    /// Scenario the issue belongs to (may be empty for a missing id).
    pub scenario_id: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catalog issue: {}: {}", self.scenario_id, self.message)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    scenario: Vec<FaultScenario>,
}

/// Immutable, ordered set of fault scenarios.
///
/// Read-only once loaded; share it by reference across sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    scenarios: Vec<FaultScenario>,
}

impl Catalog {
    /// Wraps an explicit list of scenarios.
    pub fn new(scenarios: Vec<FaultScenario>) -> Self {
        Self { scenarios }
    }

    /// Loads the catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the embedded TOML fails to parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    /// Parses a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a catalog from TOML text with `[[scenario]]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for invalid TOML or unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(s)?;
        tracing::debug!(scenarios = file.scenario.len(), "loaded fault catalog");
        Ok(Self::new(file.scenario))
    }

    /// Scenarios in catalog order.
    pub fn scenarios(&self) -> &[FaultScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Looks up a scenario by id.
    pub fn get(&self, id: &str) -> Option<&FaultScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Distinct circuit types in order of first appearance.
    pub fn circuit_types(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.scenarios
            .iter()
            .map(|s| s.circuit_type.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Checks every scenario and returns the problems found.
    ///
    /// Returns an empty vector for a sound catalog.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut ids = HashSet::new();

        for s in &self.scenarios {
            let mut issue = |message: String| {
                issues.push(CatalogIssue {
                    scenario_id: s.id.clone(),
                    message,
                });
            };

            if s.id.trim().is_empty() {
                issue("scenario id is empty".into());
            } else if !ids.insert(s.id.as_str()) {
                issue("duplicate scenario id".into());
            }
            if s.circuit_type.trim().is_empty() {
                issue("circuit_type is empty".into());
            }

            let correct = s.diagnosis_options.iter().filter(|o| o.is_correct).count();
            if correct != 1 {
                issue(format!(
                    "expected exactly one correct diagnosis option, found {correct}"
                ));
            }
            if let Some(dup) = first_duplicate(s.diagnosis_options.iter().map(|o| o.id.as_str()))
            {
                issue(format!("duplicate diagnosis option id \"{dup}\""));
            }

            if let Some(dup) = first_duplicate(s.readings().map(|r| r.id.as_str())) {
                issue(format!("duplicate reading id \"{dup}\""));
            }
            for r in s.readings() {
                if let Err(e) = r.value() {
                    issue(format!("reading \"{}\": {e}", r.id));
                }
            }
            if !s.readings().any(|r| r.is_discriminating()) {
                issue("no key reading is abnormal; the fault cannot be localised".into());
            }
        }

        issues
    }
}

fn first_duplicate<'a>(mut items: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    items.find(|item| !seen.insert(*item))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[scenario]]
id = "ring-open"
circuit_type = "ring_main"
circuit_name = "Ring Final Circuit"
symptom = "Sockets dead"
fault_kind = "open_circuit"
correct_location = "Socket 2"
rectification = "Re-terminate"
explanation = "OL end to end"
optimal_method = "Test end to end"

[[scenario.test_points]]
id = "db"
location = "Distribution Board"
description = "Outgoing terminals"

[[scenario.test_points.tests]]
id = "db-l"
label = "L end-to-end"
mode = "continuity"
reading = "OL"
unit = "Ω"
is_abnormal = true
is_key = true

[[scenario.diagnosis_options]]
id = "a"
label = "Open circuit in line conductor"
is_correct = true

[[scenario.diagnosis_options]]
id = "b"
label = "Short circuit L-N"
is_correct = false
"#;

    #[test]
    fn minimal_catalog_parses_and_validates() {
        let cat = Catalog::from_toml_str(MINIMAL).ok();
        assert_eq!(cat.as_ref().map(Catalog::len), Some(1));
        let issues = cat.map(|c| c.validate()).unwrap_or_default();
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = MINIMAL.replace("symptom =", "bogus = 1\nsymptom =");
        assert!(Catalog::from_toml_str(&toml).is_err());
    }

    #[test]
    fn two_correct_options_flagged() {
        let toml = MINIMAL.replace(
            "label = \"Short circuit L-N\"\nis_correct = false",
            "label = \"Short circuit L-N\"\nis_correct = true",
        );
        let issues = Catalog::from_toml_str(&toml)
            .map(|c| c.validate())
            .unwrap_or_default();
        assert!(issues.iter().any(|i| i.message.contains("found 2")), "{issues:?}");
    }

    #[test]
    fn non_discriminating_scenario_flagged() {
        let toml = MINIMAL.replace("is_abnormal = true", "is_abnormal = false");
        let issues = Catalog::from_toml_str(&toml)
            .map(|c| c.validate())
            .unwrap_or_default();
        assert!(issues.iter().any(|i| i.message.contains("no key reading")));
    }

    #[test]
    fn unreadable_reading_flagged() {
        let toml = MINIMAL.replace("reading = \"OL\"", "reading = \"??\"");
        let issues = Catalog::from_toml_str(&toml)
            .map(|c| c.validate())
            .unwrap_or_default();
        assert!(issues.iter().any(|i| i.message.contains("unreadable")));
    }

    #[test]
    fn duplicate_scenario_ids_flagged() {
        let cat = Catalog::from_toml_str(MINIMAL).ok();
        let mut scenarios = cat.map(|c| c.scenarios().to_vec()).unwrap_or_default();
        scenarios.extend(scenarios.clone());
        let issues = Catalog::new(scenarios).validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "duplicate scenario id");
    }

    #[test]
    fn builtin_catalog_loads() {
        let cat = Catalog::builtin();
        assert!(cat.is_ok(), "{:?}", cat.as_ref().err());
        assert_eq!(cat.map(|c| c.len()).unwrap_or(0), 30);
    }
}
