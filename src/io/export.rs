//! CSV (and optional JSON) export for demand reports and trainer sessions.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::demand::{AdvisoryFinding, DemandReport};
use crate::faults::TrainerSession;

/// Column header for demand metric export.
const METRICS_HEADER: &str = "metric,value,unit";

/// Column header for advisory export.
const ADVISORIES_HEADER: &str = "rule,severity,title,message,regulation_reference";

/// Column header for session export.
const SESSION_HEADER: &str = "position,scenario_id,circuit_type,fault_kind,chosen_option,correct";

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Writes the demand figures as `metric,value,unit` rows.
///
/// Values are written unrounded so the export can be re-checked.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_metrics_csv(report: &DemandReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(METRICS_HEADER.split(','))?;

    let p = &report.parameters;
    let r = &report.result;
    let rows: [(&str, f64, &str); 10] = [
        ("charger_count", f64::from(report.total_charger_count), "count"),
        (
            "recommended_diversity",
            f64::from(report.recommended_diversity_pct),
            "%",
        ),
        ("diversity_factor", p.diversity_factor_pct, "%"),
        ("safety_factor", p.safety_factor_pct, "%"),
        ("existing_load", p.existing_load_kw, "kW"),
        ("connected_load", r.connected_load_kw, "kW"),
        ("charging_demand", r.charging_demand_kw, "kW"),
        ("total_max_demand", r.total_max_demand_kw, "kW"),
        ("current_230v", r.current_at_230v_a, "A"),
        ("current_400v_3ph", r.current_at_400v_3ph_a, "A"),
    ];
    for (metric, value, unit) in rows {
        let value = value.to_string();
        wtr.write_record([metric, value.as_str(), unit])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes demand metrics to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_metrics_csv(report: &DemandReport, path: &Path) -> io::Result<()> {
    write_metrics_csv(report, create(path)?)
}

/// Writes advisory findings, one row each, in rule order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_advisories_csv(findings: &[AdvisoryFinding], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(ADVISORIES_HEADER.split(','))?;

    for a in findings {
        let severity = a.severity.to_string();
        wtr.write_record([
            a.rule.name(),
            severity.as_str(),
            a.title.as_str(),
            a.message.as_str(),
            a.regulation_reference.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes advisory findings to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_advisories_csv(findings: &[AdvisoryFinding], path: &Path) -> io::Result<()> {
    write_advisories_csv(findings, create(path)?)
}

/// Writes one row per session scenario; answer columns are empty until answered.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_session_csv(session: &TrainerSession<'_>, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SESSION_HEADER.split(','))?;

    for (i, s) in session.scenarios().iter().enumerate() {
        let answer = session.answer(i);
        let position = (i + 1).to_string();
        let correct = answer.map(|a| a.correct.to_string()).unwrap_or_default();
        wtr.write_record([
            position.as_str(),
            s.id.as_str(),
            s.circuit_type.as_str(),
            s.fault_kind.as_str(),
            answer.map_or("", |a| a.option_id.as_str()),
            correct.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the session table to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_session_csv(session: &TrainerSession<'_>, path: &Path) -> io::Result<()> {
    write_session_csv(session, create(path)?)
}

/// Writes the full demand report as pretty JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
#[cfg(feature = "json")]
pub fn write_report_json(report: &DemandReport, writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, report).map_err(io::Error::other)
}

/// Writes the demand report as JSON to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
#[cfg(feature = "json")]
pub fn export_report_json(report: &DemandReport, path: &Path) -> io::Result<()> {
    let mut buf = create(path)?;
    write_report_json(report, &mut buf)?;
    buf.flush()
}
