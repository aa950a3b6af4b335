//! Common test utilities and infrastructure
//!
//! Provides a scripted cluster client and configuration fixtures shared by the
//! harness integration test suites.

pub mod fixtures;
pub mod scripted;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use scripted::ScriptedClient;
