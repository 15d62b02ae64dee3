//! Fault scenario data types, deserialized from the catalog TOML.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Meter display text for an open-loop (out of range) reading.
pub const OPEN_LOOP: &str = "OL";

/// Wiring fault categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    OpenCircuit,
    ShortCircuit,
    ReversedPolarity,
    HighResistance,
}

impl FaultKind {
    /// Catalog spelling, e.g. `"open_circuit"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenCircuit => "open_circuit",
            Self::ShortCircuit => "short_circuit",
            Self::ReversedPolarity => "reversed_polarity",
            Self::HighResistance => "high_resistance",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenCircuit => "open circuit",
            Self::ShortCircuit => "short circuit",
            Self::ReversedPolarity => "reversed polarity",
            Self::HighResistance => "high resistance",
        })
    }
}

/// Multimeter function used for a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMode {
    Continuity,
    Insulation,
}

/// Unit printed next to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingUnit {
    #[serde(rename = "Ω")]
    Ohm,
    #[serde(rename = "MΩ")]
    Megohm,
}

impl ReadingUnit {
    /// Multiplier from this unit to ohms.
    pub fn to_ohms(self) -> f64 {
        match self {
            Self::Ohm => 1.0,
            Self::Megohm => 1.0e6,
        }
    }
}

impl fmt::Display for ReadingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ohm => "Ω",
            Self::Megohm => "MΩ",
        })
    }
}

/// Parsed meter display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadingValue {
    /// A numeric value in the reading's unit.
    Measured(f64),
    /// `OL`: no continuity, or resistance beyond the meter's range.
    OpenLoop,
}

/// A meter display that is neither a non-negative number nor `OL`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unreadable meter display \"{0}\"")]
pub struct ReadingParseError(pub String);

impl FromStr for ReadingValue {
    type Err = ReadingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(OPEN_LOOP) {
            return Ok(Self::OpenLoop);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Self::Measured(v)),
            _ => Err(ReadingParseError(s.to_string())),
        }
    }
}

/// One meter reading taken at a test point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestReading {
    pub id: String,
    pub label: String,
    pub mode: TestMode,
    /// Display text: a decimal such as `"0.35"` or `"OL"`.
    pub reading: String,
    pub unit: ReadingUnit,
    pub is_abnormal: bool,
    /// Whether this reading is part of the evidence that pins down the fault.
    pub is_key: bool,
}

impl TestReading {
    /// Parses the display text.
    ///
    /// # Errors
    ///
    /// Returns [`ReadingParseError`] for text that is neither numeric nor `OL`.
    pub fn value(&self) -> Result<ReadingValue, ReadingParseError> {
        self.reading.parse()
    }

    /// Reading in ohms, or `None` for `OL` and unreadable text.
    pub fn ohms(&self) -> Option<f64> {
        match self.value() {
            Ok(ReadingValue::Measured(v)) => Some(v * self.unit.to_ohms()),
            _ => None,
        }
    }

    /// Key reading that is also abnormal.
    pub fn is_discriminating(&self) -> bool {
        self.is_key && self.is_abnormal
    }
}

impl fmt::Display for TestReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reading.trim().eq_ignore_ascii_case(OPEN_LOOP) {
            write!(f, "{}: {}", self.label, OPEN_LOOP)
        } else {
            write!(f, "{}: {} {}", self.label, self.reading, self.unit)
        }
    }
}

/// A physical location on the circuit where readings are taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestPoint {
    pub id: String,
    pub location: String,
    pub description: String,
    pub tests: Vec<TestReading>,
}

/// One multiple-choice answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosisOption {
    pub id: String,
    pub label: String,
    pub is_correct: bool,
}

/// A fault-finding exercise on one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaultScenario {
    pub id: String,
    /// Grouping key used for stratified session sampling.
    pub circuit_type: String,
    pub circuit_name: String,
    pub symptom: String,
    pub fault_kind: FaultKind,
    pub test_points: Vec<TestPoint>,
    pub diagnosis_options: Vec<DiagnosisOption>,
    pub correct_location: String,
    pub rectification: String,
    pub explanation: String,
    /// How an experienced electrician would localise the fault.
    pub optimal_method: String,
}

impl FaultScenario {
    /// The first option marked correct.
    pub fn correct_option(&self) -> Option<&DiagnosisOption> {
        self.diagnosis_options.iter().find(|o| o.is_correct)
    }

    /// Looks up a diagnosis option by id.
    pub fn option(&self, id: &str) -> Option<&DiagnosisOption> {
        self.diagnosis_options.iter().find(|o| o.id == id)
    }

    /// All readings across every test point, in presentation order.
    pub fn readings(&self) -> impl Iterator<Item = &TestReading> {
        self.test_points.iter().flat_map(|p| p.tests.iter())
    }

    /// Readings flagged as key evidence.
    pub fn key_readings(&self) -> impl Iterator<Item = &TestReading> {
        self.readings().filter(|r| r.is_key)
    }
}
