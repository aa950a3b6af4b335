//! Topic readiness polling
//!
//! Freshly created topics go through a short convergence window in which
//! metadata requests report missing leaders and produce/offset requests land
//! on brokers that do not yet know about the partition. The coordinator polls
//! through that window in two phases, both bounded by one absolute deadline:
//!
//! 1. refresh metadata until the client reports the topic
//! 2. probe every partition until each one answers from its leader
//!
//! Errors outside each phase's transient set abort the wait immediately.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::client::{ClientError, ClusterClient};
use super::clock::{Clock, SystemClock};
use crate::error::{HarnessError, HarnessResult, WaitPhase};

const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Backoff between polling attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub metadata_backoff: Duration,
    pub partition_backoff: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            metadata_backoff: Duration::from_secs(1),
            partition_backoff: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessPhase {
    NotStarted,
    AwaitingMetadata,
    AwaitingPartitionLeadership,
    Ready,
    TimedOut,
    Failed,
}

impl ReadinessPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReadinessPhase::Ready | ReadinessPhase::TimedOut | ReadinessPhase::Failed
        )
    }
}

/// Progress of one topic towards readiness
#[derive(Debug, Clone)]
pub struct TopicReadiness {
    topic: String,
    phase: ReadinessPhase,
    partitions: BTreeSet<i32>,
    leader_known: BTreeMap<i32, bool>,
    metadata_retries: u32,
    leadership_retries: u32,
}

impl TopicReadiness {
    pub fn new<S: Into<String>>(topic: S) -> Self {
        Self {
            topic: topic.into(),
            phase: ReadinessPhase::NotStarted,
            partitions: BTreeSet::new(),
            leader_known: BTreeMap::new(),
            metadata_retries: 0,
            leadership_retries: 0,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn phase(&self) -> ReadinessPhase {
        self.phase
    }

    pub fn partitions(&self) -> &BTreeSet<i32> {
        &self.partitions
    }

    pub fn leader_known(&self, partition: i32) -> bool {
        self.leader_known.get(&partition).copied().unwrap_or(false)
    }

    /// Partitions whose leadership has not been confirmed yet
    pub fn pending_partitions(&self) -> Vec<i32> {
        self.leader_known
            .iter()
            .filter(|(_, known)| !**known)
            .map(|(partition, _)| *partition)
            .collect()
    }

    pub fn metadata_retries(&self) -> u32 {
        self.metadata_retries
    }

    pub fn leadership_retries(&self) -> u32 {
        self.leadership_retries
    }

    pub fn is_ready(&self) -> bool {
        self.phase == ReadinessPhase::Ready
    }
}

/// Drives a [`ClusterClient`] until a topic is usable
#[derive(Debug, Clone)]
pub struct ReadinessCoordinator<K: Clock = SystemClock> {
    clock: K,
    policy: ReadinessPolicy,
}

impl ReadinessCoordinator<SystemClock> {
    pub fn new(policy: ReadinessPolicy) -> Self {
        Self::with_clock(SystemClock, policy)
    }
}

impl<K: Clock> ReadinessCoordinator<K> {
    pub fn with_clock(clock: K, policy: ReadinessPolicy) -> Self {
        Self { clock, policy }
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    /// Absolute deadline `timeout` from now
    ///
    /// Saturates at a far-future instant when `timeout` cannot be represented.
    pub fn deadline_after(&self, timeout: Duration) -> Instant {
        let now = self.clock.now();
        now.checked_add(timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now)
    }

    /// Block until every partition of `state.topic()` has a known leader
    ///
    /// Returns `Timeout` if `deadline` passes first and propagates any
    /// non-transient client error unchanged. The deadline is only checked
    /// between attempts.
    pub fn await_ready<C>(
        &self,
        client: &mut C,
        state: &mut TopicReadiness,
        deadline: Instant,
    ) -> HarnessResult<()>
    where
        C: ClusterClient + ?Sized,
    {
        info!("⏳ Waiting for topic '{}' to become ready", state.topic);

        let result = self
            .await_metadata(client, state, deadline)
            .and_then(|()| self.await_leadership(client, state, deadline));

        state.phase = match &result {
            Ok(()) => ReadinessPhase::Ready,
            Err(HarnessError::Timeout { .. }) => ReadinessPhase::TimedOut,
            Err(_) => ReadinessPhase::Failed,
        };

        match &result {
            Ok(()) => info!(
                "✅ Topic '{}' ready ({} partitions, {} metadata retries, {} leadership retries)",
                state.topic,
                state.partitions.len(),
                state.metadata_retries,
                state.leadership_retries
            ),
            Err(e) => warn!("❌ Topic '{}' not ready: {}", state.topic, e),
        }

        result
    }

    fn await_metadata<C>(
        &self,
        client: &mut C,
        state: &mut TopicReadiness,
        deadline: Instant,
    ) -> HarnessResult<()>
    where
        C: ClusterClient + ?Sized,
    {
        state.phase = ReadinessPhase::AwaitingMetadata;

        loop {
            if self.clock.now() >= deadline {
                return Err(HarnessError::Timeout {
                    topic: state.topic.clone(),
                    phase: WaitPhase::Metadata,
                    pending: Vec::new(),
                });
            }

            match client.refresh_metadata(&state.topic) {
                Ok(()) if client.has_metadata(&state.topic) => {
                    debug!("📋 Metadata loaded for topic '{}'", state.topic);
                    return Ok(());
                }
                Ok(()) => {
                    debug!("Metadata refreshed but topic '{}' not listed yet", state.topic);
                }
                Err(e) if e.is_transient_for_metadata() => {
                    debug!("🔄 Transient metadata error for '{}': {}", state.topic, e);
                }
                Err(e) => return Err(fatal(&state.topic, e)),
            }

            state.metadata_retries += 1;
            self.clock.sleep(self.policy.metadata_backoff);
        }
    }

    fn await_leadership<C>(
        &self,
        client: &mut C,
        state: &mut TopicReadiness,
        deadline: Instant,
    ) -> HarnessResult<()>
    where
        C: ClusterClient + ?Sized,
    {
        state.phase = ReadinessPhase::AwaitingPartitionLeadership;
        state.partitions = client.partitions_for(&state.topic);
        state.leader_known = state.partitions.iter().map(|p| (*p, false)).collect();

        let partitions: Vec<i32> = state.partitions.iter().copied().collect();
        for partition in partitions {
            loop {
                match client.probe_leadership(&state.topic, partition) {
                    Ok(()) => {
                        state.leader_known.insert(partition, true);
                        debug!("Leader confirmed for {}/{}", state.topic, partition);
                        break;
                    }
                    Err(e) if e.is_transient_for_leadership() => {
                        if self.clock.now() >= deadline {
                            return Err(HarnessError::Timeout {
                                topic: state.topic.clone(),
                                phase: WaitPhase::PartitionLeadership,
                                pending: state.pending_partitions(),
                            });
                        }
                        debug!(
                            "🔄 Transient leadership error for {}/{}: {}",
                            state.topic, partition, e
                        );
                        state.leadership_retries += 1;
                        self.clock.sleep(self.policy.partition_backoff);
                    }
                    Err(e) => return Err(fatal(&state.topic, e)),
                }
            }
        }

        Ok(())
    }
}

fn fatal(topic: &str, source: ClientError) -> HarnessError {
    HarnessError::Client {
        topic: topic.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::client::MockClusterClient;
    use crate::runtime::clock::ManualClock;
    use assert_matches::assert_matches;
    use mockall::Sequence;

    fn leader_not_available(topic: &str) -> Result<(), ClientError> {
        Err(ClientError::LeaderNotAvailable {
            topic: topic.to_string(),
        })
    }

    fn partitions(ids: &[i32]) -> BTreeSet<i32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_deadline_saturates_on_huge_timeout() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());

        let deadline = coordinator.deadline_after(Duration::MAX);

        assert!(deadline >= clock.now() + Duration::from_secs(365 * 24 * 60 * 60));
        assert_eq!(
            coordinator.deadline_after(Duration::from_secs(5)),
            clock.now() + Duration::from_secs(5)
        );
    }

    #[test]
    fn test_metadata_retries_then_ready() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();
        let mut seq = Sequence::new();

        client
            .expect_refresh_metadata()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|topic| leader_not_available(topic));
        client
            .expect_refresh_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        client.expect_has_metadata().times(1).returning(|_| true);
        client
            .expect_partitions_for()
            .returning(|_| partitions(&[0]));
        client
            .expect_probe_leadership()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(30));

        coordinator.await_ready(&mut client, &mut state, deadline).unwrap();

        assert!(state.is_ready());
        assert_eq!(state.metadata_retries(), 3);
        assert_eq!(state.leadership_retries(), 0);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1); 3]);
    }

    #[test]
    fn test_metadata_times_out_at_deadline() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();

        client
            .expect_refresh_metadata()
            .times(5)
            .returning(|_| Err(ClientError::InvalidTopic { topic: "orders".into() }));

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(5));

        let err = coordinator
            .await_ready(&mut client, &mut state, deadline)
            .unwrap_err();

        assert_matches!(
            err,
            HarnessError::Timeout { phase: WaitPhase::Metadata, .. }
        );
        assert_eq!(state.phase(), ReadinessPhase::TimedOut);
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
    }

    #[test]
    fn test_refresh_without_metadata_keeps_polling() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();
        let mut listed = false;

        client.expect_refresh_metadata().times(2).returning(|_| Ok(()));
        client.expect_has_metadata().times(2).returning(move |_| {
            let was_listed = listed;
            listed = true;
            was_listed
        });
        client.expect_partitions_for().returning(|_| BTreeSet::new());

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(30));

        coordinator.await_ready(&mut client, &mut state, deadline).unwrap();

        assert_eq!(state.metadata_retries(), 1);
        assert!(state.partitions().is_empty());
        assert!(state.is_ready());
    }

    #[test]
    fn test_partition_retries_only_failing_partition() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();
        let mut failures_left = 2;

        client.expect_refresh_metadata().returning(|_| Ok(()));
        client.expect_has_metadata().returning(|_| true);
        client
            .expect_partitions_for()
            .returning(|_| partitions(&[0, 1, 2]));
        client
            .expect_probe_leadership()
            .withf(|_, partition| *partition != 1)
            .times(2)
            .returning(|_, _| Ok(()));
        client
            .expect_probe_leadership()
            .withf(|_, partition| *partition == 1)
            .times(3)
            .returning(move |topic, partition| {
                if failures_left > 0 {
                    failures_left -= 1;
                    Err(ClientError::NotLeaderForPartition {
                        topic: topic.to_string(),
                        partition,
                    })
                } else {
                    Ok(())
                }
            });

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(30));

        coordinator.await_ready(&mut client, &mut state, deadline).unwrap();

        assert_eq!(state.leadership_retries(), 2);
        assert!(state.pending_partitions().is_empty());
        assert!((0..3).all(|p| state.leader_known(p)));
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(100); 2]);
    }

    #[test]
    fn test_partition_timeout_reports_pending() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();

        client.expect_refresh_metadata().returning(|_| Ok(()));
        client.expect_has_metadata().returning(|_| true);
        client
            .expect_partitions_for()
            .returning(|_| partitions(&[0, 1]));
        client
            .expect_probe_leadership()
            .withf(|_, partition| *partition == 0)
            .returning(|_, _| Ok(()));
        client
            .expect_probe_leadership()
            .withf(|_, partition| *partition == 1)
            .times(11)
            .returning(|_, _| Err(ClientError::FailedPayloads { message: "send".into() }));

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(1));

        let err = coordinator
            .await_ready(&mut client, &mut state, deadline)
            .unwrap_err();

        assert_matches!(
            err,
            HarnessError::Timeout { phase: WaitPhase::PartitionLeadership, ref pending, .. } if pending == &vec![1]
        );
        assert_eq!(state.phase(), ReadinessPhase::TimedOut);
        assert!(state.leader_known(0));
        assert_eq!(clock.sleep_count(), 10);
    }

    #[test]
    fn test_fatal_error_is_not_retried() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();

        client
            .expect_refresh_metadata()
            .times(1)
            .returning(|_| Err(ClientError::Broker { message: "authorization failed".into() }));

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(30));

        let err = coordinator
            .await_ready(&mut client, &mut state, deadline)
            .unwrap_err();

        assert_matches!(err, HarnessError::Client { source: ClientError::Broker { .. }, .. });
        assert_eq!(state.phase(), ReadinessPhase::Failed);
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn test_leadership_error_during_metadata_is_fatal() {
        let clock = ManualClock::new();
        let coordinator = ReadinessCoordinator::with_clock(&clock, ReadinessPolicy::default());
        let mut client = MockClusterClient::new();

        client.expect_refresh_metadata().times(1).returning(|topic| {
            Err(ClientError::NotLeaderForPartition {
                topic: topic.to_string(),
                partition: 0,
            })
        });

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(30));

        assert!(coordinator.await_ready(&mut client, &mut state, deadline).is_err());
        assert_eq!(state.phase(), ReadinessPhase::Failed);
    }

    #[test]
    fn test_custom_backoff_is_used() {
        let clock = ManualClock::new();
        let policy = ReadinessPolicy {
            metadata_backoff: Duration::from_millis(250),
            partition_backoff: Duration::from_millis(10),
        };
        let coordinator = ReadinessCoordinator::with_clock(&clock, policy);
        let mut client = MockClusterClient::new();
        let mut seq = Sequence::new();

        client
            .expect_refresh_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|topic| leader_not_available(topic));
        client
            .expect_refresh_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        client.expect_has_metadata().returning(|_| true);
        client.expect_partitions_for().returning(|_| partitions(&[7]));
        let mut probed = false;
        client.expect_probe_leadership().times(2).returning(move |topic, _| {
            if probed {
                Ok(())
            } else {
                probed = true;
                Err(ClientError::UnknownTopicOrPartition {
                    topic: topic.to_string(),
                    partition: Some(7),
                })
            }
        });

        let mut state = TopicReadiness::new("orders");
        let deadline = coordinator.deadline_after(Duration::from_secs(30));
        coordinator.await_ready(&mut client, &mut state, deadline).unwrap();

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(250), Duration::from_millis(10)]
        );
    }
}
