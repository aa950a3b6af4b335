//! Unique message payloads for a test case
//!
//! Payloads look like `{label}-{case id}-{uuid}` so that messages produced by
//! one case can never be confused with leftovers from another run on the same
//! topic, while repeated lookups inside one case return the same bytes.

use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MessageKeyer {
    identity: String,
    messages: HashMap<String, Vec<u8>>,
}

impl MessageKeyer {
    pub fn new<S: Into<String>>(identity: S) -> Self {
        Self {
            identity: identity.into(),
            messages: HashMap::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Payload for `label`, generated on first use and memoized afterwards
    pub fn get_or_create(&mut self, label: &str) -> Vec<u8> {
        let identity = &self.identity;
        self.messages
            .entry(label.to_string())
            .or_insert_with(|| format!("{}-{}-{}", label, identity, Uuid::new_v4()).into_bytes())
            .clone()
    }

    /// One payload per label, in input order
    pub fn get_or_create_many<I, S>(&mut self, labels: I) -> Vec<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.get_or_create(label.as_ref()))
            .collect()
    }

    /// Number of distinct labels generated so far
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
