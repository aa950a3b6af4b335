//! Integration test case lifecycle
//!
//! An [`IntegrationCase`] owns everything one test needs against a live
//! cluster: a dedicated topic, an exclusive client that has already waited for
//! the topic to become ready, and a [`MessageKeyer`] for unique payloads.
//! Dropping the case closes the client, so the connection is released even
//! when the test body panics.

use rand::{Rng, distributions::Alphanumeric};
use shared::logging::log_success;
use shared::{case_debug, case_info, case_warn};
use std::fmt;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::runtime::{ClientError, Clock, ClusterClient, ReadinessCoordinator, TopicReadiness};
use crate::testing::keyer::MessageKeyer;
use crate::testing::versions::SkipReason;

const TOPIC_SUFFIX_LEN: usize = 10;

/// Result of setting up a case: ready to run, or skipped
pub enum CaseSetup<C: ClusterClient> {
    Ready(IntegrationCase<C>),
    Skipped(SkipReason),
}

impl<C: ClusterClient> CaseSetup<C> {
    pub fn into_ready(self) -> Option<IntegrationCase<C>> {
        match self {
            CaseSetup::Ready(case) => Some(case),
            CaseSetup::Skipped(_) => None,
        }
    }
}

pub struct IntegrationCase<C: ClusterClient> {
    id: String,
    topic: String,
    client: C,
    closed: bool,
    readiness: TopicReadiness,
    keyer: MessageKeyer,
}

impl<C: ClusterClient> IntegrationCase<C> {
    /// Prepare a case: check the cluster version is known, pick a topic,
    /// connect, and wait for the topic to become ready
    ///
    /// `connect` is only invoked once the case is known to run.
    pub fn setup<K, F>(
        config: &HarnessConfig,
        case_id: &str,
        coordinator: &ReadinessCoordinator<K>,
        connect: F,
    ) -> HarnessResult<CaseSetup<C>>
    where
        K: Clock,
        F: FnOnce(&HarnessConfig) -> Result<C, ClientError>,
    {
        if !config.cluster_version.is_known() {
            case_warn!(case_id, "⏭️ Integration test requires KAFKA_VERSION, skipping");
            return Ok(CaseSetup::Skipped(SkipReason::VersionUnknown));
        }

        let topic = config
            .topic
            .clone()
            .unwrap_or_else(|| generated_topic(case_id));

        case_info!(case_id, "🚀 Setting up case on topic '{}' via {}", topic, config.bootstrap);

        let client = connect(config).map_err(|source| HarnessError::Connect { source })?;

        let mut case = IntegrationCase {
            id: case_id.to_string(),
            topic: topic.clone(),
            client,
            closed: false,
            readiness: TopicReadiness::new(topic),
            keyer: MessageKeyer::new(case_id),
        };

        let deadline = coordinator.deadline_after(config.readiness_timeout);
        coordinator.await_ready(&mut case.client, &mut case.readiness, deadline)?;
        log_success(&case.id, &format!("Case ready on topic '{}'", case.topic));

        Ok(CaseSetup::Ready(case))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn readiness(&self) -> &TopicReadiness {
        &self.readiness
    }

    /// Unique payload for `label`, stable for the lifetime of this case
    pub fn msg(&mut self, label: &str) -> Vec<u8> {
        self.keyer.get_or_create(label)
    }

    pub fn msgs<I, S>(&mut self, labels: I) -> Vec<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keyer.get_or_create_many(labels)
    }

    /// Close the client now instead of waiting for drop
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.client.close();
        case_debug!(self.id, "🛑 Client closed for topic '{}'", self.topic);
    }
}

impl<C: ClusterClient> fmt::Debug for CaseSetup<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseSetup::Ready(case) => f.debug_tuple("Ready").field(case).finish(),
            CaseSetup::Skipped(reason) => f.debug_tuple("Skipped").field(reason).finish(),
        }
    }
}

impl<C: ClusterClient> fmt::Debug for IntegrationCase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationCase")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("closed", &self.closed)
            .field("readiness", &self.readiness)
            .finish_non_exhaustive()
    }
}

impl<C: ClusterClient> Drop for IntegrationCase<C> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Topic name derived from the last segment of a test path plus a random suffix
pub fn generated_topic(case_id: &str) -> String {
    let short = case_id
        .rsplit(|c: char| c == ':' || c == '.')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("topic");
    format!("{}-{}", short, random_suffix(TOPIC_SUFFIX_LEN))
}

/// Random ASCII letters
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .filter(char::is_ascii_alphabetic)
        .take(len)
        .collect()
}
