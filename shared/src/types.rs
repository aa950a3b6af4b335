//! Core version types shared by the harness

use crate::errors::{SharedError, SharedResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dotted integer version such as `0.10.1.0`
///
/// Ordering is element-wise lexicographic. A version that runs out of
/// components first compares as smaller, so `0.10 < 0.10.0`; missing
/// components are never padded with zeros.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(Vec<u64>);

impl Version {
    pub fn new(components: Vec<u64>) -> SharedResult<Self> {
        if components.is_empty() {
            return Err(SharedError::InvalidVersion {
                input: String::new(),
            });
        }
        Ok(Self(components))
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Version {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SharedError::InvalidVersion {
            input: s.to_string(),
        };

        let components = s
            .split('.')
            .map(|part| part.parse::<u64>().map_err(|_| invalid()))
            .collect::<SharedResult<Vec<_>>>()?;

        Self::new(components).map_err(|_| invalid())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

/// Version of the cluster under test, fixed for the lifetime of a harness run
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClusterVersion {
    Known(Version),
    #[default]
    Unknown,
}

impl ClusterVersion {
    /// Interpret a raw configuration value; absent or blank means unknown
    pub fn from_config_value(value: Option<&str>) -> SharedResult<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(ClusterVersion::Unknown),
            Some(raw) => raw.parse().map(ClusterVersion::Known),
        }
    }

    pub fn known(&self) -> Option<&Version> {
        match self {
            ClusterVersion::Known(version) => Some(version),
            ClusterVersion::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.known().is_some()
    }
}

impl fmt::Display for ClusterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterVersion::Known(version) => write!(f, "{version}"),
            ClusterVersion::Unknown => write!(f, "unknown"),
        }
    }
}
