//! Harness Configuration
//!
//! Settings read once at harness startup. The cluster version in particular is
//! resolved here and then only passed around by reference.

use serde::Serialize;
use shared::{ClusterVersion, SharedError, SharedResult};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::runtime::ReadinessPolicy;

pub const KAFKA_VERSION: &str = "KAFKA_VERSION";
pub const KAFKA_BOOTSTRAP: &str = "KAFKA_BOOTSTRAP";
pub const KAFKA_TOPIC: &str = "KAFKA_TOPIC";
pub const READY_TIMEOUT_SECS: &str = "HARNESS_READY_TIMEOUT_SECS";
pub const METADATA_BACKOFF_MS: &str = "HARNESS_METADATA_BACKOFF_MS";
pub const PARTITION_BACKOFF_MS: &str = "HARNESS_PARTITION_BACKOFF_MS";
pub const LOG_LEVEL: &str = "HARNESS_LOG_LEVEL";

/// Longest readiness wait accepted from configuration (one day)
pub const MAX_READY_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarnessConfig {
    #[serde(serialize_with = "serialize_display")]
    pub cluster_version: ClusterVersion,
    pub bootstrap: String,
    pub topic: Option<String>,
    pub readiness_timeout: Duration,
    pub metadata_backoff: Duration,
    pub partition_backoff: Duration,
    pub log_level: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let policy = ReadinessPolicy::default();
        Self {
            cluster_version: ClusterVersion::Unknown,
            bootstrap: "localhost:9092".to_string(),
            topic: None,
            readiness_timeout: Duration::from_secs(30),
            metadata_backoff: policy.metadata_backoff,
            partition_backoff: policy.partition_backoff,
            log_level: "info".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::HarnessConfigBuilder {
        crate::config::builder::HarnessConfigBuilder::new()
    }

    /// Load from the process environment, after applying any `.env` file
    pub fn from_env() -> SharedResult<Self> {
        Self::from_env_with_version(None)
    }

    /// Like [`from_env`](Self::from_env), but `version` replaces `KAFKA_VERSION`
    /// when given, so a malformed environment value never gets parsed
    pub fn from_env_with_version(version: Option<&str>) -> SharedResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(with_version_override(version, |key| std::env::var(key).ok()))
    }

    /// Load from a `.env`-style file without touching the process environment
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> SharedResult<Self> {
        let path = path.as_ref();
        let file_error = |e: dotenvy::Error| SharedError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(file_error)? {
            let (key, value) = item.map_err(file_error)?;
            values.insert(key, value);
        }

        Self::from_lookup(|key| values.get(key).cloned())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let cluster_version = ClusterVersion::from_config_value(lookup(KAFKA_VERSION).as_deref())
            .map_err(|_| SharedError::InvalidConfig {
                field: KAFKA_VERSION.to_string(),
                value: lookup(KAFKA_VERSION).unwrap_or_default(),
            })?;

        let readiness_timeout = match non_empty(READY_TIMEOUT_SECS) {
            Some(raw) => match parse_field::<u64>(READY_TIMEOUT_SECS, &raw)? {
                secs if secs <= MAX_READY_TIMEOUT_SECS => Duration::from_secs(secs),
                _ => {
                    return Err(SharedError::InvalidConfig {
                        field: READY_TIMEOUT_SECS.to_string(),
                        value: raw,
                    });
                }
            },
            None => defaults.readiness_timeout,
        };
        let metadata_backoff = match non_empty(METADATA_BACKOFF_MS) {
            Some(raw) => Duration::from_millis(parse_field(METADATA_BACKOFF_MS, &raw)?),
            None => defaults.metadata_backoff,
        };
        let partition_backoff = match non_empty(PARTITION_BACKOFF_MS) {
            Some(raw) => Duration::from_millis(parse_field(PARTITION_BACKOFF_MS, &raw)?),
            None => defaults.partition_backoff,
        };

        Ok(Self {
            cluster_version,
            bootstrap: non_empty(KAFKA_BOOTSTRAP).unwrap_or(defaults.bootstrap),
            topic: non_empty(KAFKA_TOPIC),
            readiness_timeout,
            metadata_backoff,
            partition_backoff,
            log_level: non_empty(LOG_LEVEL).unwrap_or(defaults.log_level),
        })
    }

    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            metadata_backoff: self.metadata_backoff,
            partition_backoff: self.partition_backoff,
        }
    }

    /// Check if this configuration is valid
    pub fn is_valid(&self) -> bool {
        !self.bootstrap.trim().is_empty()
            && !self.readiness_timeout.is_zero()
            && self.readiness_timeout <= Duration::from_secs(MAX_READY_TIMEOUT_SECS)
    }
}

/// Wrap `lookup` so that `version`, when given, answers for `KAFKA_VERSION`
pub fn with_version_override<F>(version: Option<&str>, lookup: F) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let version = version.map(str::to_string);
    move |key: &str| match &version {
        Some(value) if key == KAFKA_VERSION => Some(value.clone()),
        _ => lookup(key),
    }
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> SharedResult<T> {
    raw.trim().parse().map_err(|_| SharedError::InvalidConfig {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn serialize_display<S: serde::Serializer>(
    value: &ClusterVersion,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
