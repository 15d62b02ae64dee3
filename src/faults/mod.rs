//! Fault-finding trainer: scenario catalog, session sampling, and diagnosis checks.

/// Built-in scenario catalog.
pub mod catalog;
pub mod session;
pub mod types;

pub use catalog::{Catalog, CatalogError, CatalogIssue};
pub use session::{
    DEFAULT_SESSION_SIZE, FaultError, SessionScore, TrainerSession, pick_session_faults,
    pick_session_faults_with, validate_diagnosis,
};
pub use types::{
    DiagnosisOption, FaultKind, FaultScenario, ReadingUnit, ReadingValue, TestMode, TestPoint,
    TestReading,
};
