//! TOML-based site configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::demand::{
    ChargerLoadSet, DemandError, DemandParameters, DemandReport, recommended_diversity,
};
use crate::faults::DEFAULT_SESSION_SIZE;

/// Top-level site configuration parsed from TOML.
///
/// Missing sections fall back to the `domestic` preset values. Load from
/// TOML with [`SiteConfig::from_toml_file`] or use [`SiteConfig::domestic`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Demand adjustment factors.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Charger schedule, one entry per line.
    #[serde(default = "default_chargers")]
    pub chargers: Vec<ChargerConfig>,
    /// Fault trainer session settings.
    #[serde(default)]
    pub trainer: TrainerConfig,
}

/// Demand adjustment factors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Diversity factor (%), advisory range 0–100.
    pub diversity_factor_pct: f64,
    /// Safety margin (%), advisory range 0–50.
    pub safety_factor_pct: f64,
    /// Existing installation load (kW).
    pub existing_load_kw: f64,
    /// Replace `diversity_factor_pct` with the recommended figure for the charger count.
    pub auto_diversity: bool,
}

impl Default for DemandConfig {
    fn default() -> Self {
        let p = DemandParameters::default();
        Self {
            diversity_factor_pct: p.diversity_factor_pct,
            safety_factor_pct: p.safety_factor_pct,
            existing_load_kw: p.existing_load_kw,
            auto_diversity: false,
        }
    }
}

/// One charger line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargerConfig {
    /// Per-charger power (kW).
    pub power_kw: f64,
    /// Number of chargers.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

fn default_chargers() -> Vec<ChargerConfig> {
    vec![ChargerConfig {
        power_kw: 7.0,
        quantity: 1,
    }]
}

/// Fault trainer session settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Faults per session.
    pub session_size: usize,
    /// Fixed seed for reproducible sessions; system randomness when absent.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            session_size: DEFAULT_SESSION_SIZE,
            seed: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"chargers[0].quantity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<DemandError> for ConfigError {
    fn from(e: DemandError) -> Self {
        Self {
            field: "chargers".into(),
            message: e.to_string(),
        }
    }
}

impl SiteConfig {
    /// Single 7 kW home charger on an otherwise unloaded supply.
    pub fn domestic() -> Self {
        Self {
            demand: DemandConfig::default(),
            chargers: default_chargers(),
            trainer: TrainerConfig::default(),
        }
    }

    /// Office car park: mixed 7 kW and 22 kW posts with managed diversity.
    pub fn workplace() -> Self {
        Self {
            demand: DemandConfig {
                diversity_factor_pct: 75.0,
                existing_load_kw: 45.0,
                ..DemandConfig::default()
            },
            chargers: vec![
                ChargerConfig {
                    power_kw: 7.0,
                    quantity: 6,
                },
                ChargerConfig {
                    power_kw: 22.0,
                    quantity: 2,
                },
            ],
            trainer: TrainerConfig::default(),
        }
    }

    /// Fleet depot with rapid chargers and a large existing load.
    pub fn depot() -> Self {
        Self {
            demand: DemandConfig {
                diversity_factor_pct: 70.0,
                safety_factor_pct: 20.0,
                existing_load_kw: 60.0,
                auto_diversity: false,
            },
            chargers: vec![
                ChargerConfig {
                    power_kw: 22.0,
                    quantity: 12,
                },
                ChargerConfig {
                    power_kw: 50.0,
                    quantity: 4,
                },
            ],
            trainer: TrainerConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["domestic", "workplace", "depot"];

    /// Loads a site from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "domestic" => Ok(Self::domestic()),
            "workplace" => Ok(Self::workplace()),
            "depot" => Ok(Self::depot()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a site from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "site".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a site from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates structural constraints and returns a list of errors.
    ///
    /// Factor percentages outside their advisory ranges are not errors;
    /// see [`DemandParameters::out_of_range_fields`].
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.chargers.is_empty() {
            errors.push(ConfigError {
                field: "chargers".into(),
                message: "at least one charger is required".into(),
            });
        }
        for (i, c) in self.chargers.iter().enumerate() {
            if c.power_kw.is_nan() || c.power_kw < 0.0 {
                errors.push(ConfigError {
                    field: format!("chargers[{i}].power_kw"),
                    message: "must be >= 0".into(),
                });
            }
            if c.quantity == 0 {
                errors.push(ConfigError {
                    field: format!("chargers[{i}].quantity"),
                    message: "must be >= 1".into(),
                });
            }
        }
        let total: u64 = self.chargers.iter().map(|c| u64::from(c.quantity)).sum();
        if total > u64::from(u32::MAX) {
            errors.push(ConfigError {
                field: "chargers".into(),
                message: format!("total quantity {total} exceeds {}", u32::MAX),
            });
        }

        let d = &self.demand;
        if d.existing_load_kw.is_nan() || d.existing_load_kw < 0.0 {
            errors.push(ConfigError {
                field: "demand.existing_load_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if !d.diversity_factor_pct.is_finite() {
            errors.push(ConfigError {
                field: "demand.diversity_factor_pct".into(),
                message: "must be a finite number".into(),
            });
        }
        if !d.safety_factor_pct.is_finite() {
            errors.push(ConfigError {
                field: "demand.safety_factor_pct".into(),
                message: "must be a finite number".into(),
            });
        }

        if self.trainer.session_size == 0 {
            errors.push(ConfigError {
                field: "trainer.session_size".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }

    /// Builds the charger working set described by `chargers`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `chargers` is empty.
    pub fn charger_set(&self) -> Result<ChargerLoadSet, ConfigError> {
        let lines = self.chargers.iter().map(|c| (c.power_kw, c.quantity));
        Ok(ChargerLoadSet::from_loads(lines)?)
    }

    /// Demand parameters, applying `auto_diversity` against `set`.
    pub fn parameters_for(&self, set: &ChargerLoadSet) -> DemandParameters {
        let d = &self.demand;
        let diversity = if d.auto_diversity {
            f64::from(recommended_diversity(set.total_charger_count()))
        } else {
            d.diversity_factor_pct
        };
        DemandParameters::new(diversity, d.safety_factor_pct, d.existing_load_kw)
    }

    /// Builds the working set and evaluates the full demand report.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `chargers` is empty.
    pub fn evaluate(&self) -> Result<DemandReport, ConfigError> {
        let set = self.charger_set()?;
        let params = self.parameters_for(&set);
        Ok(DemandReport::evaluate(set.loads(), &params))
    }
}
