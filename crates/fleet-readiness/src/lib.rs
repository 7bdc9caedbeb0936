//! Cognitive-readiness scoring and triage for fleet-safety monitoring.
//!
//! The [`fleet::scoring`] module holds the pure readiness engine. Everything
//! else in [`fleet`] composes it with operator, session and alert records.

pub mod config;
pub mod error;
pub mod fleet;
pub mod telemetry;
