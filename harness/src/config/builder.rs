//! Harness Configuration Builder
//!
//! Provides a builder pattern for constructing harness configurations in tests

use shared::{ClusterVersion, SharedResult, Version};
use std::time::Duration;

use super::HarnessConfig;

pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Set the cluster version under test
    pub fn cluster_version(mut self, version: ClusterVersion) -> Self {
        self.config.cluster_version = version;
        self
    }

    /// Set the cluster version from a dotted string such as `0.10.1.0`
    pub fn kafka_version(mut self, version: &str) -> SharedResult<Self> {
        self.config.cluster_version = ClusterVersion::Known(version.parse::<Version>()?);
        Ok(self)
    }

    /// Set broker bootstrap address
    pub fn bootstrap<S: Into<String>>(mut self, bootstrap: S) -> Self {
        self.config.bootstrap = bootstrap.into();
        self
    }

    /// Use a fixed topic name instead of a generated one
    pub fn topic<S: Into<String>>(mut self, topic: S) -> Self {
        self.config.topic = Some(topic.into());
        self
    }

    /// Set the time budget for topic readiness
    pub fn readiness_timeout(mut self, timeout: Duration) -> Self {
        self.config.readiness_timeout = timeout;
        self
    }

    /// Set sleep between metadata refresh attempts
    pub fn metadata_backoff(mut self, backoff: Duration) -> Self {
        self.config.metadata_backoff = backoff;
        self
    }

    /// Set sleep between partition leadership probes
    pub fn partition_backoff(mut self, backoff: Duration) -> Self {
        self.config.partition_backoff = backoff;
        self
    }

    /// Set log level (trace, debug, info, warn, error)
    pub fn log_level<S: Into<String>>(mut self, level: S) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> HarnessConfig {
        self.config
    }
}

impl Default for HarnessConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
