//! Harness-specific error types

use shared::SharedError;
use std::fmt;
use thiserror::Error;

use crate::runtime::ClientError;

/// Readiness phase in which a deadline expired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    Metadata,
    PartitionLeadership,
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitPhase::Metadata => write!(f, "topic metadata"),
            WaitPhase::PartitionLeadership => write!(f, "partition leadership"),
        }
    }
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Unrecognized version constraint: '{expr}'")]
    InvalidConstraint { expr: String },

    #[error("Timeout waiting for {phase} on topic '{topic}' (pending partitions: {pending:?})")]
    Timeout {
        topic: String,
        phase: WaitPhase,
        pending: Vec<i32>,
    },

    #[error("Cluster client error on topic '{topic}': {source}")]
    Client {
        topic: String,
        #[source]
        source: ClientError,
    },

    #[error("Failed to connect cluster client: {source}")]
    Connect {
        #[source]
        source: ClientError,
    },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),
}

impl HarnessError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarnessError::Timeout { .. })
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
