//! Test fixtures for harness configuration

use harness::{HarnessConfig, ReadinessPolicy};
use std::time::Duration;

pub struct TestFixtures;

#[allow(dead_code)]
impl TestFixtures {
    pub const CASE_ID: &'static str = "case_lifecycle::test_round_trip";
    pub const VERSION: &'static str = "0.10.1.0";

    /// Known version, short timeout
    pub fn config() -> HarnessConfig {
        HarnessConfig::builder()
            .kafka_version(Self::VERSION)
            .unwrap()
            .readiness_timeout(Duration::from_secs(5))
            .build()
    }

    /// Known version with a fixed topic
    pub fn config_with_topic(topic: &str) -> HarnessConfig {
        let mut config = Self::config();
        config.topic = Some(topic.to_string());
        config
    }

    pub fn policy() -> ReadinessPolicy {
        ReadinessPolicy::default()
    }
}
