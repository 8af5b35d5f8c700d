//! Transition history (tamper-evident)
//!
//! Append-only. Each entry carries the hash of the entry before it, so an
//! edited or deleted record breaks the chain.

use crate::graph::Status;
use chrono::{DateTime, Utc};
use grc_common::ActorId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const GENESIS: &str = "genesis";

/// One accepted status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: String,
    pub from_status: Status,
    pub to_status: Status,
    pub actor: ActorId,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

/// History entry with its chain hashes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub record: TransitionRecord,
    pub prev_hash: String,
    pub hash: String,
}

impl HistoryEntry {
    fn seal(record: TransitionRecord, prev_hash: &str) -> Self {
        let hash = compute_hash(&record, prev_hash);
        Self {
            record,
            prev_hash: prev_hash.to_string(),
            hash,
        }
    }
}

fn compute_hash(record: &TransitionRecord, prev_hash: &str) -> String {
    let data = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        record.id,
        record.timestamp.to_rfc3339(),
        record.from_status,
        record.to_status,
        record.actor,
        record.comment,
        prev_hash
    );
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// Ordered transition history of one entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionHistory {
    entries: Vec<HistoryEntry>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal and append a record
    pub(crate) fn append(&mut self, record: TransitionRecord) -> &HistoryEntry {
        let prev_hash = self
            .entries
            .last()
            .map(|e| e.hash.clone())
            .unwrap_or_else(|| GENESIS.to_string());
        self.entries.push(HistoryEntry::seal(record, &prev_hash));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Records oldest first
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.entries.last().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify chain integrity
    pub fn verify_integrity(&self) -> IntegrityResult {
        let mut prev_hash = GENESIS.to_string();
        let mut valid_count = 0;

        for entry in &self.entries {
            if entry.prev_hash != prev_hash {
                return IntegrityResult {
                    valid: false,
                    checked_count: valid_count,
                    error: Some(format!("Hash chain broken at transition {}", entry.record.id)),
                };
            }

            if compute_hash(&entry.record, &prev_hash) != entry.hash {
                return IntegrityResult {
                    valid: false,
                    checked_count: valid_count,
                    error: Some(format!("Transition {} hash mismatch", entry.record.id)),
                };
            }

            // Consecutive records must connect
            if valid_count > 0 && self.entries[valid_count - 1].record.to_status != entry.record.from_status {
                return IntegrityResult {
                    valid: false,
                    checked_count: valid_count,
                    error: Some(format!("Transition {} does not start where the previous ended", entry.record.id)),
                };
            }

            prev_hash = entry.hash.clone();
            valid_count += 1;
        }

        IntegrityResult {
            valid: true,
            checked_count: valid_count,
            error: None,
        }
    }
}

/// Integrity check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityResult {
    pub valid: bool,
    pub checked_count: usize,
    pub error: Option<String>,
}
