//! Testing Framework
//!
//! This module provides version gating, the integration case lifecycle, and
//! the small helpers used inside test bodies.

pub mod case;
pub mod keyer;
pub mod timer;
pub mod versions;

// Re-export main types
pub use case::{CaseSetup, IntegrationCase};
pub use keyer::MessageKeyer;
pub use timer::{ElapsedTimer, RunningTimer, TimedInterval};
pub use versions::{ConstraintSet, Gate, Operator, SkipReason, VersionConstraint};
