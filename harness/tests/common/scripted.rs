//! Hand-written cluster client that replays scripted responses

use harness::{ClientError, ClusterClient};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays queued results; once a queue is empty every call succeeds
#[derive(Debug, Default)]
pub struct ScriptedClient {
    pub metadata_results: VecDeque<Result<(), ClientError>>,
    pub probe_results: VecDeque<Result<(), ClientError>>,
    pub partitions: BTreeSet<i32>,
    pub refresh_calls: usize,
    pub probe_calls: usize,
    closes: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedClient {
    pub fn with_partitions(ids: &[i32]) -> Self {
        Self {
            partitions: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn fail_metadata(mut self, error: ClientError, times: usize) -> Self {
        for _ in 0..times {
            self.metadata_results.push_back(Err(error.clone()));
        }
        self
    }

    pub fn fail_probes(mut self, error: ClientError, times: usize) -> Self {
        for _ in 0..times {
            self.probe_results.push_back(Err(error.clone()));
        }
        self
    }

    /// Counter that survives the client being moved into a case
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl ClusterClient for ScriptedClient {
    fn refresh_metadata(&mut self, _topic: &str) -> Result<(), ClientError> {
        self.refresh_calls += 1;
        self.metadata_results.pop_front().unwrap_or(Ok(()))
    }

    fn has_metadata(&self, _topic: &str) -> bool {
        true
    }

    fn partitions_for(&self, _topic: &str) -> BTreeSet<i32> {
        self.partitions.clone()
    }

    fn probe_leadership(&mut self, _topic: &str, _partition: i32) -> Result<(), ClientError> {
        self.probe_calls += 1;
        self.probe_results.pop_front().unwrap_or(Ok(()))
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
