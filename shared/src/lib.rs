//! Shared types for the cluster integration harness
//!
//! Contains the version model read from the environment, the error type for
//! configuration problems, and the logging setup used by every harness binary
//! and test.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;

// Used by exported macros
#[doc(hidden)]
pub use tracing;
