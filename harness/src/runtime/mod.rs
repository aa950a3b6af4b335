//! Runtime Management
//!
//! This module handles the cluster client seam, time sources, and the polling
//! that brings a topic to a ready state before a test body runs.

pub mod client;
pub mod clock;
pub mod readiness;

// Re-export main types
pub use client::{ClientError, ClusterClient, MockClusterClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use readiness::{ReadinessCoordinator, ReadinessPhase, ReadinessPolicy, TopicReadiness};
