//! Cluster client seam
//!
//! The harness never speaks the broker protocol itself. It drives whatever
//! client the test suite provides through [`ClusterClient`], which keeps the
//! readiness logic testable against mocks.

use std::collections::BTreeSet;
use thiserror::Error;

/// Errors reported by a cluster client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Leader not available for topic '{topic}'")]
    LeaderNotAvailable { topic: String },

    #[error("Invalid topic: '{topic}'")]
    InvalidTopic { topic: String },

    #[error("Broker is not the leader for {topic}/{partition}")]
    NotLeaderForPartition { topic: String, partition: i32 },

    #[error("Unknown topic or partition: {topic}/{partition:?}")]
    UnknownTopicOrPartition {
        topic: String,
        partition: Option<i32>,
    },

    #[error("Failed to send payloads: {message}")]
    FailedPayloads { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Broker error: {message}")]
    Broker { message: String },
}

impl ClientError {
    /// Errors expected while topic metadata propagates after creation
    pub fn is_transient_for_metadata(&self) -> bool {
        matches!(
            self,
            ClientError::LeaderNotAvailable { .. } | ClientError::InvalidTopic { .. }
        )
    }

    /// Errors expected while partition leaders are still being elected
    pub fn is_transient_for_leadership(&self) -> bool {
        matches!(
            self,
            ClientError::NotLeaderForPartition { .. }
                | ClientError::UnknownTopicOrPartition { .. }
                | ClientError::FailedPayloads { .. }
        )
    }
}

/// Capabilities the harness needs from a messaging client
///
/// A client is owned exclusively by one test case; implementations need not
/// be safe for concurrent use.
#[mockall::automock]
pub trait ClusterClient {
    /// Reload cluster metadata for `topic`
    fn refresh_metadata(&mut self, topic: &str) -> Result<(), ClientError>;

    /// Whether the last refresh produced metadata for `topic`
    fn has_metadata(&self, topic: &str) -> bool;

    /// Partition ids currently known for `topic`
    fn partitions_for(&self, topic: &str) -> BTreeSet<i32>;

    /// Lightweight request that only succeeds once the partition has a leader
    /// (typically a latest-offset query)
    fn probe_leadership(&mut self, topic: &str, partition: i32) -> Result<(), ClientError>;

    /// Release the connection
    fn close(&mut self);
}
