//! Core demand types: charger loads, adjustment factors, and computed demand.

use serde::Serialize;
use thiserror::Error;

/// Advisory range for the diversity factor (percent).
pub const DIVERSITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Advisory range for the safety factor (percent).
pub const SAFETY_RANGE_PCT: (f64, f64) = (0.0, 50.0);

/// One line of the charger schedule: `quantity` identical chargers of `power_kw`.
///
/// # Examples
///
/// ```
/// use elec_trainer::demand::types::ChargerLoad;
///
/// let load = ChargerLoad::new(1, 7.0, 2);
/// assert_eq!(load.connected_kw(), 14.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargerLoad {
    /// Identifier, unique within a working set.
    pub id: u32,
    /// Nameplate power per charger (kW, >= 0).
    pub power_kw: f64,
    /// Number of chargers on this line (>= 1).
    pub quantity: u32,
}

impl ChargerLoad {
    /// Creates a charger line without clamping its values.
    pub fn new(id: u32, power_kw: f64, quantity: u32) -> Self {
        Self {
            id,
            power_kw,
            quantity,
        }
    }

    /// Nameplate power times quantity (kW).
    pub fn connected_kw(&self) -> f64 {
        self.power_kw * f64::from(self.quantity)
    }
}

/// Adjustment factors applied on top of the connected load.
///
/// Factors are raw percentages. Nothing here clamps or rejects values
/// outside the advisory ranges; [`DemandParameters::out_of_range_fields`]
/// only reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandParameters {
    /// Diversity factor (%), advisory range 0–100.
    pub diversity_factor_pct: f64,
    /// Safety margin (%), advisory range 0–50.
    pub safety_factor_pct: f64,
    /// Existing installation load (kW, >= 0).
    pub existing_load_kw: f64,
}

impl Default for DemandParameters {
    fn default() -> Self {
        Self {
            diversity_factor_pct: 100.0,
            safety_factor_pct: 15.0,
            existing_load_kw: 0.0,
        }
    }
}

impl DemandParameters {
    /// Creates parameters from raw percentages and existing load.
    pub fn new(diversity_factor_pct: f64, safety_factor_pct: f64, existing_load_kw: f64) -> Self {
        Self {
            diversity_factor_pct,
            safety_factor_pct,
            existing_load_kw,
        }
    }

    /// Names of the fields that fall outside their advisory ranges.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let (d_lo, d_hi) = DIVERSITY_RANGE_PCT;
        if !(d_lo..=d_hi).contains(&self.diversity_factor_pct) {
            fields.push("diversity_factor_pct");
        }
        let (s_lo, s_hi) = SAFETY_RANGE_PCT;
        if !(s_lo..=s_hi).contains(&self.safety_factor_pct) {
            fields.push("safety_factor_pct");
        }
        if self.existing_load_kw < 0.0 {
            fields.push("existing_load_kw");
        }
        fields
    }
}

/// Maximum-demand figures derived from a charger schedule.
///
/// Values are unrounded; rounding belongs to whoever displays them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandResult {
    /// Sum of power times quantity over all chargers (kW).
    pub connected_load_kw: f64,
    /// Connected load after diversity (kW).
    pub charging_demand_kw: f64,
    /// Existing plus charging demand, with the safety margin applied (kW).
    pub total_max_demand_kw: f64,
    /// Current drawn at 230 V single phase (A).
    pub current_at_230v_a: f64,
    /// Line current at 400 V three phase (A).
    pub current_at_400v_3ph_a: f64,
}

/// Errors raised by the charger working set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DemandError {
    /// Removing this charger would leave the working set empty.
    #[error("cannot remove charger {0}: at least one charger is required")]
    LastCharger(u32),

    /// No charger with this id exists in the working set.
    #[error("unknown charger id {0}")]
    UnknownCharger(u32),

    /// A working set was built from an empty list of loads.
    #[error("a charger working set needs at least one charger")]
    EmptyWorkingSet,
}
