use crate::model::{CapturedRequest, CapturedResponse};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEntry {
    pub key: String,
    pub request: CapturedRequest,
    /// `None` when the HTTP call never produced a response.
    pub response: Option<CapturedResponse>,
}

/// Append-only log of the request/response pairs produced during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExecutionRecord {
    entries: Vec<RecordEntry>,
}

impl ExecutionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RecordEntry) {
        self.entries.push(entry);
    }

    /// Latest entry recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&RecordEntry> {
        self.entries.iter().rev().find(|entry| entry.key == key)
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
