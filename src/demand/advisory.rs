//! Rule-based advisory findings for a computed demand.
//!
//! Rules run in the fixed order of [`AdvisoryRule::ALL`]. Each rule is an
//! independent predicate: several may fire together and none suppresses
//! another. Rules 2 and 3 overlap for larger fleets with high diversity and
//! both are reported.

use std::fmt;

use serde::Serialize;

use super::calculator::single_phase_current_a;
use super::loads::total_charger_count;
use super::types::{ChargerLoad, DemandParameters, DemandResult};

/// Per-charger power above which a dedicated three-phase supply is flagged (kW).
pub const HIGH_POWER_CHARGER_KW: f64 = 22.0;
/// Total maximum demand above which a DNO application is flagged (kW).
pub const HIGH_TOTAL_DEMAND_KW: f64 = 100.0;
/// 230 V current above which supply capacity is flagged (A).
pub const HIGH_CURRENT_A: f64 = 200.0;
/// Safety margin below which growth headroom is flagged (%).
pub const LOW_SAFETY_PCT: f64 = 10.0;
/// Safety margin above which oversizing is flagged (%).
pub const HIGH_SAFETY_PCT: f64 = 25.0;
/// Domestic single-charger power above which supply checks are advised (kW).
pub const DOMESTIC_CHARGER_KW: f64 = 11.0;
/// Existing load below which a single charger is treated as domestic (kW).
pub const DOMESTIC_EXISTING_LOAD_KW: f64 = 20.0;

/// How strongly a finding should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Design likely needs changing or further approval.
    Warning,
    /// Guidance only.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Info => f.write_str("info"),
        }
    }
}

/// One advisory produced by a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryFinding {
    /// Rule that produced the finding.
    pub rule: AdvisoryRule,
    /// Presentation severity.
    pub severity: Severity,
    /// Short heading.
    pub title: String,
    /// Full advisory text with interpolated figures.
    pub message: String,
    /// Regulation or guidance document the advice draws on.
    pub regulation_reference: String,
}

/// Inputs every rule sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub loads: &'a [ChargerLoad],
    pub params: &'a DemandParameters,
    pub result: &'a DemandResult,
    /// Sum of quantities across `loads`.
    pub total_charger_count: u32,
}

/// The advisory battery, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryRule {
    HighPowerCharger,
    LowDiversitySmallFleet,
    DiversityLargerFleet,
    HighTotalDemand,
    HighCurrentDemand,
    LowSafetyFactor,
    HighSafetyFactor,
    SingleHighPowerDomestic,
}

impl AdvisoryRule {
    /// Every rule, in the order findings are reported.
    pub const ALL: [AdvisoryRule; 8] = [
        Self::HighPowerCharger,
        Self::LowDiversitySmallFleet,
        Self::DiversityLargerFleet,
        Self::HighTotalDemand,
        Self::HighCurrentDemand,
        Self::LowSafetyFactor,
        Self::HighSafetyFactor,
        Self::SingleHighPowerDomestic,
    ];

    /// Stable snake_case identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::HighPowerCharger => "high_power_charger",
            Self::LowDiversitySmallFleet => "low_diversity_small_fleet",
            Self::DiversityLargerFleet => "diversity_larger_fleet",
            Self::HighTotalDemand => "high_total_demand",
            Self::HighCurrentDemand => "high_current_demand",
            Self::LowSafetyFactor => "low_safety_factor",
            Self::HighSafetyFactor => "high_safety_factor",
            Self::SingleHighPowerDomestic => "single_high_power_domestic",
        }
    }

    /// Severity of findings from this rule.
    pub fn severity(self) -> Severity {
        match self {
            Self::HighPowerCharger
            | Self::HighTotalDemand
            | Self::HighCurrentDemand
            | Self::LowSafetyFactor => Severity::Warning,
            Self::LowDiversitySmallFleet
            | Self::DiversityLargerFleet
            | Self::HighSafetyFactor
            | Self::SingleHighPowerDomestic => Severity::Info,
        }
    }

    /// Returns `true` when the rule's trigger condition holds.
    pub fn fires(self, ctx: &RuleContext<'_>) -> bool {
        let count = ctx.total_charger_count;
        let diversity = ctx.params.diversity_factor_pct;
        let safety = ctx.params.safety_factor_pct;

        match self {
            Self::HighPowerCharger => ctx
                .loads
                .iter()
                .any(|l| l.power_kw > HIGH_POWER_CHARGER_KW),
            Self::LowDiversitySmallFleet => count >= 2 && diversity > 90.0,
            Self::DiversityLargerFleet => count >= 5 && diversity > 80.0,
            Self::HighTotalDemand => ctx.result.total_max_demand_kw > HIGH_TOTAL_DEMAND_KW,
            // Always judged on the 230 V figure, even for three-phase supplies.
            Self::HighCurrentDemand => {
                single_phase_current_a(ctx.result.total_max_demand_kw) > HIGH_CURRENT_A
            }
            Self::LowSafetyFactor => safety < LOW_SAFETY_PCT,
            Self::HighSafetyFactor => safety > HIGH_SAFETY_PCT,
            Self::SingleHighPowerDomestic => {
                count == 1
                    && ctx
                        .loads
                        .first()
                        .is_some_and(|l| l.power_kw > DOMESTIC_CHARGER_KW)
                    && ctx.params.existing_load_kw < DOMESTIC_EXISTING_LOAD_KW
            }
        }
    }

    /// Evaluates the rule, producing a finding when it fires.
    pub fn evaluate(self, ctx: &RuleContext<'_>) -> Option<AdvisoryFinding> {
        if !self.fires(ctx) {
            return None;
        }
        let (title, message, regulation_reference) = self.text(ctx);
        Some(AdvisoryFinding {
            rule: self,
            severity: self.severity(),
            title: title.to_string(),
            message,
            regulation_reference: regulation_reference.to_string(),
        })
    }

    fn text(self, ctx: &RuleContext<'_>) -> (&'static str, String, &'static str) {
        let count = ctx.total_charger_count;
        let diversity = ctx.params.diversity_factor_pct;
        let safety = ctx.params.safety_factor_pct;
        let total = ctx.result.total_max_demand_kw;

        match self {
            Self::HighPowerCharger => (
                "High-power charger",
                format!(
                    "One or more chargers exceed {HIGH_POWER_CHARGER_KW} kW. Chargers above this \
                     rating are DC rapid units that need a dedicated three-phase supply, \
                     coordination with the DNO, and manufacturer-specific protection."
                ),
                "BS 7671 Section 722; IET Code of Practice for EV Charging Equipment Installation",
            ),
            Self::LowDiversitySmallFleet => (
                "Diversity could be reduced",
                format!(
                    "With {count} chargers a diversity factor of {diversity}% assumes almost all \
                     will charge at full power together. Load management or smart charging \
                     usually justifies a lower figure."
                ),
                "IET Code of Practice for EV Charging Equipment Installation, Section 6",
            ),
            Self::DiversityLargerFleet => (
                "Diversity optimisation for larger installation",
                format!(
                    "Installations of {count} or more chargers rarely see simultaneous full-power \
                     charging. Consider a diversity factor at or below 80% (currently \
                     {diversity}%), backed by a load management system."
                ),
                "BS 7671 Regulation 311.1; Regulation 722.311",
            ),
            Self::HighTotalDemand => (
                "High total demand",
                format!(
                    "Total maximum demand of {total:.1} kW exceeds {HIGH_TOTAL_DEMAND_KW} kW. \
                     A supply capacity check and DNO application are likely to be required."
                ),
                "ENA Engineering Recommendation G100; BS 7671 Regulation 132.6",
            ),
            Self::HighCurrentDemand => (
                "High current demand",
                format!(
                    "The design current at 230 V is {:.0} A, above {HIGH_CURRENT_A} A. Check the \
                     incoming supply rating and consider a three-phase supply or load management.",
                    single_phase_current_a(total)
                ),
                "BS 7671 Regulation 311.1; Regulation 433.1",
            ),
            Self::LowSafetyFactor => (
                "Low safety factor",
                format!(
                    "A safety margin of {safety}% leaves little headroom for future chargers or \
                     load growth. A margin of at least {LOW_SAFETY_PCT}% is recommended."
                ),
                "BS 7671 Regulation 132.16",
            ),
            Self::HighSafetyFactor => (
                "High safety factor",
                format!(
                    "A safety margin of {safety}% may oversize cables and protective devices. \
                     Margins above {HIGH_SAFETY_PCT}% should be justified by planned expansion."
                ),
                "BS 7671 Regulation 132.6",
            ),
            Self::SingleHighPowerDomestic => (
                "High-power domestic charger",
                format!(
                    "A single charger above {DOMESTIC_CHARGER_KW} kW on a domestic supply usually \
                     needs a three-phase supply. Check the supply fuse rating and notify the DNO."
                ),
                "ENA Engineering Recommendation G12/4; IET Code of Practice for EV Charging",
            ),
        }
    }
}

impl fmt::Display for AdvisoryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs every rule in order and collects the findings that fire.
///
/// # Examples
///
/// ```
/// use elec_trainer::demand::advisory::{AdvisoryRule, evaluate_advisories};
/// use elec_trainer::demand::calculator::compute_demand;
/// use elec_trainer::demand::types::{ChargerLoad, DemandParameters};
///
/// let loads = [ChargerLoad::new(1, 50.0, 1)];
/// let params = DemandParameters::new(100.0, 15.0, 0.0);
/// let result = compute_demand(&loads, &params);
/// let rules: Vec<_> = evaluate_advisories(&loads, &params, &result)
///     .iter()
///     .map(|f| f.rule)
///     .collect();
/// assert!(rules.contains(&AdvisoryRule::HighCurrentDemand));
/// assert!(!rules.contains(&AdvisoryRule::HighTotalDemand));
/// ```
pub fn evaluate_advisories(
    loads: &[ChargerLoad],
    params: &DemandParameters,
    result: &DemandResult,
) -> Vec<AdvisoryFinding> {
    let ctx = RuleContext {
        loads,
        params,
        result,
        total_charger_count: total_charger_count(loads),
    };

    AdvisoryRule::ALL
        .iter()
        .filter_map(|rule| {
            let finding = rule.evaluate(&ctx);
            if finding.is_some() {
                tracing::trace!(rule = rule.name(), "advisory rule fired");
            }
            finding
        })
        .collect()
}
