//! Configuration file tests
//!
//! Verify that `.env`-style files produce the expected harness configuration
//! and feed version gating without touching the process environment.

use assert_matches::assert_matches;
use harness::{ClusterVersion, ConstraintSet, Gate, HarnessConfig, SkipReason};
use shared::SharedError;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn env_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_env_file_drives_gating() {
    let file = env_file(
        "# cluster under test\nKAFKA_VERSION=0.10.1.0\nHARNESS_READY_TIMEOUT_SECS=10\n",
    );

    let config = HarnessConfig::from_env_file(file.path()).unwrap();

    assert_eq!(config.cluster_version.to_string(), "0.10.1.0");
    assert_eq!(config.readiness_timeout, Duration::from_secs(10));
    assert_eq!(config.readiness_policy().metadata_backoff, Duration::from_secs(1));

    let newer = ConstraintSet::parse_all([">=0.10.1.0"]).unwrap();
    let older = ConstraintSet::parse_all(["<0.10"]).unwrap();
    assert_eq!(newer.gate(&config.cluster_version), Gate::Run);
    assert_matches!(
        older.gate(&config.cluster_version),
        Gate::Skip(SkipReason::UnsupportedVersion { .. })
    );
}

#[test]
fn test_env_file_without_version_skips() {
    let file = env_file("KAFKA_BOOTSTRAP=broker:9092\nKAFKA_VERSION=\n");

    let config = HarnessConfig::from_env_file(file.path()).unwrap();

    assert_eq!(config.cluster_version, ClusterVersion::Unknown);
    assert_eq!(config.bootstrap, "broker:9092");
    assert_eq!(
        ConstraintSet::default().gate(&config.cluster_version),
        Gate::Skip(SkipReason::VersionUnknown)
    );
}

#[test]
fn test_env_file_with_bad_backoff() {
    let file = env_file("HARNESS_PARTITION_BACKOFF_MS=fast\n");

    assert_matches!(
        HarnessConfig::from_env_file(file.path()),
        Err(SharedError::InvalidConfig { field, .. }) if field == "HARNESS_PARTITION_BACKOFF_MS"
    );
}

#[test]
fn test_missing_env_file() {
    let dir = tempfile::tempdir().unwrap();

    assert_matches!(
        HarnessConfig::from_env_file(dir.path().join("missing.env")),
        Err(SharedError::ConfigFile { .. })
    );
}

#[test]
fn test_env_file_with_unbounded_timeout() {
    let file = env_file("KAFKA_VERSION=0.10.1.0\nHARNESS_READY_TIMEOUT_SECS=18446744073709551615\n");

    assert_matches!(
        HarnessConfig::from_env_file(file.path()),
        Err(SharedError::InvalidConfig { field, .. }) if field == "HARNESS_READY_TIMEOUT_SECS"
    );
}
