//! Electrical installation toolkit: EV charger maximum-demand assessment and
//! a fault-finding trainer driven by a catalog of scripted circuit faults.
//!
//! The library is a pure core. [`demand`] computes loads, currents and
//! advisories; [`faults`] samples and grades training sessions. [`config`]
//! and [`io`] cover site files and exports for the `elec-trainer` binary.

pub mod config;
pub mod demand;
pub mod faults;
pub mod io;
pub mod logging;
