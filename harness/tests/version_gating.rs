//! Version gating from a downstream test crate
//!
//! `require_versions!` is expanded here, outside the harness crate, with no
//! direct `tracing` import in scope.

use harness::{HarnessConfig, require_versions};
use std::cell::Cell;

fn gated(config: &HarnessConfig, ran: &Cell<bool>) {
    require_versions!(config, ">=0.10.1.0");
    ran.set(true);
}

#[test]
fn test_gate_runs_on_supported_version() {
    let config = HarnessConfig::builder().kafka_version("0.10.2").unwrap().build();
    let ran = Cell::new(false);

    gated(&config, &ran);

    assert!(ran.get());
}

#[test]
fn test_gate_returns_early_on_older_version() {
    let config = HarnessConfig::builder().kafka_version("0.9.0.1").unwrap().build();
    let ran = Cell::new(false);

    gated(&config, &ran);

    assert!(!ran.get());
}

#[test]
fn test_gate_accepts_wide_version_components() {
    let config = HarnessConfig::builder().kafka_version("0.10.4294967296").unwrap().build();
    let ran = Cell::new(false);

    gated(&config, &ran);

    assert!(ran.get());
}
