//! File export for reports and sessions.

pub mod export;
