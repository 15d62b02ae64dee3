//! EV-charging maximum-demand calculation and advisory rules.

/// Advisory rule battery.
pub mod advisory;
pub mod calculator;
/// Caller-owned charger working set.
pub mod loads;
pub mod report;
pub mod types;

pub use advisory::{AdvisoryFinding, AdvisoryRule, Severity, evaluate_advisories};
pub use calculator::{compute_demand, recommended_diversity};
pub use loads::ChargerLoadSet;
pub use report::DemandReport;
pub use types::{ChargerLoad, DemandError, DemandParameters, DemandResult};
