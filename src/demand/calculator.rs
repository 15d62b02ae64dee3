//! Maximum-demand arithmetic and diversity guidance.

use super::types::{ChargerLoad, DemandParameters, DemandResult};

/// Single-phase supply voltage in kV, used as the kW→A divisor.
pub const SINGLE_PHASE_KV: f64 = 0.23;

/// Three-phase line voltage in kV.
pub const THREE_PHASE_KV: f64 = 0.4;

/// Computes connected load, diversified demand, and maximum demand.
///
/// The arithmetic is applied exactly as written, with no rounding and no
/// range checks: negative or >100 % factors flow straight through.
///
/// # Examples
///
/// ```
/// use elec_trainer::demand::calculator::compute_demand;
/// use elec_trainer::demand::types::{ChargerLoad, DemandParameters};
///
/// let loads = [ChargerLoad::new(1, 7.0, 2)];
/// let result = compute_demand(&loads, &DemandParameters::new(100.0, 15.0, 0.0));
/// assert_eq!(result.connected_load_kw, 14.0);
/// assert!((result.total_max_demand_kw - 16.1).abs() < 1e-9);
/// ```
pub fn compute_demand(loads: &[ChargerLoad], params: &DemandParameters) -> DemandResult {
    let connected_load_kw = loads
        .iter()
        .fold(0.0_f64, |acc, l| acc + l.power_kw * f64::from(l.quantity));

    let diversity = params.diversity_factor_pct / 100.0;
    let safety = (100.0 + params.safety_factor_pct) / 100.0;

    let charging_demand_kw = connected_load_kw * diversity;
    let total_max_demand_kw = (params.existing_load_kw + charging_demand_kw) * safety;

    let result = DemandResult {
        connected_load_kw,
        charging_demand_kw,
        total_max_demand_kw,
        current_at_230v_a: single_phase_current_a(total_max_demand_kw),
        current_at_400v_3ph_a: three_phase_current_a(total_max_demand_kw),
    };

    tracing::debug!(
        chargers = loads.len(),
        connected_kw = result.connected_load_kw,
        total_kw = result.total_max_demand_kw,
        "computed maximum demand"
    );

    result
}

/// Current at 230 V for a demand in kW.
pub fn single_phase_current_a(demand_kw: f64) -> f64 {
    demand_kw / SINGLE_PHASE_KV
}

/// Line current at 400 V three phase for a demand in kW.
pub fn three_phase_current_a(demand_kw: f64) -> f64 {
    demand_kw / (THREE_PHASE_KV * 3.0_f64.sqrt())
}

/// Recommended diversity factor (%) for a number of chargers.
///
/// | chargers | diversity |
/// |----------|-----------|
/// | 0–1      | 100       |
/// | 2–5      | 85        |
/// | 6–10     | 75        |
/// | 11–20    | 70        |
/// | > 20     | 65        |
pub fn recommended_diversity(total_charger_count: u32) -> u32 {
    match total_charger_count {
        0..=1 => 100,
        2..=5 => 85,
        6..=10 => 75,
        11..=20 => 70,
        _ => 65,
    }
}
