//! Cluster Integration Test Harness
//!
//! Support code for running messaging-client tests against a live broker
//! cluster.
//!
//! ## Main Interface
//!
//! The primary interface is [`IntegrationCase`], which gates a test on the
//! configured cluster version, connects a client, and waits until the test's
//! topic has a leader for every partition.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use harness::*;
//!
//! let config = HarnessConfig::from_env()?;
//! require_versions!(config, ">=0.10.1.0");
//!
//! let coordinator = ReadinessCoordinator::new(config.readiness_policy());
//! let setup = IntegrationCase::setup(&config, "producer::test_send", &coordinator, |cfg| {
//!     MyClient::connect(&cfg.bootstrap)
//! })?;
//!
//! if let CaseSetup::Ready(mut case) = setup {
//!     let payload = case.msg("first");
//!     let (_, timing) = ElapsedTimer::measure_system(|| send(case.client_mut(), &payload));
//!     assert!(timing.interval < std::time::Duration::from_secs(1));
//! }
//! ```

#[macro_use]
mod macros;

// Core modules
pub mod config;
pub mod error;
pub mod runtime;
pub mod testing;

// Main interfaces - re-exported at crate root for convenience
pub use config::{HarnessConfig, HarnessConfigBuilder};
pub use error::{HarnessError, HarnessResult, WaitPhase};
pub use runtime::{ReadinessCoordinator, ReadinessPolicy, TopicReadiness};
pub use testing::{CaseSetup, IntegrationCase};

// Supporting types
pub use runtime::{ClientError, Clock, ClusterClient, ManualClock, MockClusterClient, SystemClock};
pub use runtime::ReadinessPhase;
pub use testing::{ConstraintSet, Gate, Operator, SkipReason, VersionConstraint};
pub use testing::{ElapsedTimer, MessageKeyer, RunningTimer, TimedInterval};
pub use shared::{ClusterVersion, Version};

// Used by exported macros
#[doc(hidden)]
pub use tracing;
