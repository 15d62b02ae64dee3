//! Bundled demand evaluation for display and export.

use std::fmt;

use serde::Serialize;

use super::advisory::{AdvisoryFinding, Severity, evaluate_advisories};
use super::calculator::{compute_demand, recommended_diversity};
use super::loads::total_charger_count;
use super::types::{ChargerLoad, DemandParameters, DemandResult};

/// Everything a caller shows after one recalculation.
///
/// Computed in one pass from the same inputs so the figures and the
/// advisories can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandReport {
    /// Inputs the report was computed from.
    pub parameters: DemandParameters,
    /// Sum of charger quantities.
    pub total_charger_count: u32,
    /// Diversity factor suggested for `total_charger_count` (%).
    pub recommended_diversity_pct: u32,
    /// Computed demand figures.
    pub result: DemandResult,
    /// Findings in rule order.
    pub advisories: Vec<AdvisoryFinding>,
}

impl DemandReport {
    /// Computes demand and advisories for a charger schedule.
    pub fn evaluate(loads: &[ChargerLoad], params: &DemandParameters) -> Self {
        let result = compute_demand(loads, params);
        let advisories = evaluate_advisories(loads, params, &result);
        let count = total_charger_count(loads);

        Self {
            parameters: *params,
            total_charger_count: count,
            recommended_diversity_pct: recommended_diversity(count),
            result,
            advisories,
        }
    }

    /// Returns `true` if any finding is a warning.
    pub fn has_warnings(&self) -> bool {
        self.advisories
            .iter()
            .any(|f| f.severity == Severity::Warning)
    }
}

impl fmt::Display for DemandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.result;
        let p = &self.parameters;
        writeln!(f, "--- Maximum Demand ---")?;
        writeln!(
            f,
            "Chargers:              {} (recommended diversity {}%)",
            self.total_charger_count, self.recommended_diversity_pct
        )?;
        writeln!(
            f,
            "Factors:               diversity {}%, safety {}%",
            p.diversity_factor_pct, p.safety_factor_pct
        )?;
        writeln!(f, "Existing load:         {:.1} kW", p.existing_load_kw)?;
        writeln!(f, "Connected load:        {:.1} kW", r.connected_load_kw)?;
        writeln!(f, "Charging demand:       {:.1} kW", r.charging_demand_kw)?;
        writeln!(f, "Total maximum demand:  {:.1} kW", r.total_max_demand_kw)?;
        writeln!(f, "Current @ 230 V:       {:.0} A", r.current_at_230v_a)?;
        write!(f, "Current @ 400 V 3ph:   {:.0} A", r.current_at_400v_3ph_a)?;

        if !self.advisories.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "--- Advisories ---")?;
            for a in &self.advisories {
                writeln!(f)?;
                writeln!(f, "[{}] {}", a.severity, a.title)?;
                writeln!(f, "    {}", a.message)?;
                write!(f, "    Ref: {}", a.regulation_reference)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_rounds_only_for_display() {
        let loads = [ChargerLoad::new(1, 7.0, 2)];
        let report = DemandReport::evaluate(&loads, &DemandParameters::new(100.0, 15.0, 0.0));
        assert!((report.result.total_max_demand_kw - 16.1).abs() < 1e-9);

        let text = report.to_string();
        assert!(text.contains("Total maximum demand:  16.1 kW"), "{text}");
        assert!(text.contains("Current @ 230 V:       70 A"), "{text}");
        assert!(text.contains("Current @ 400 V 3ph:   23 A"), "{text}");
    }

    #[test]
    fn report_carries_recommended_diversity() {
        let loads = [ChargerLoad::new(1, 7.0, 4), ChargerLoad::new(2, 22.0, 4)];
        let report = DemandReport::evaluate(&loads, &DemandParameters::default());
        assert_eq!(report.total_charger_count, 8);
        assert_eq!(report.recommended_diversity_pct, 75);
    }

    #[test]
    fn quiet_report_has_no_advisory_section() {
        let loads = [ChargerLoad::new(1, 7.0, 1)];
        let report = DemandReport::evaluate(&loads, &DemandParameters::default());
        assert!(report.advisories.is_empty());
        assert!(!report.has_warnings());
        assert!(!report.to_string().contains("Advisories"));
    }
}
