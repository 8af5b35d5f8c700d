//! Workflow entity aggregate
//!
//! # Invariants
//! - `status` equals the `to_status` of the last history record, or the
//!   initial status while history is empty
//! - History is append-only

use crate::catalog::WorkflowKind;
use crate::graph::Status;
use crate::history::{TransitionHistory, TransitionRecord};
use grc_common::{GrcError, GrcResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document, remediation gap, finding or any other entity with a lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEntity {
    id: String,
    kind: WorkflowKind,
    initial_status: Status,
    status: Status,
    history: TransitionHistory,
}

impl WorkflowEntity {
    /// Create entity in `initial` status with a generated id
    ///
    /// Outside the crate, entities come from [`WorkflowMachine::create_entity`]
    /// or [`WorkflowStore::create`], which start them at the lifecycle's
    /// initial status.
    ///
    /// [`WorkflowMachine::create_entity`]: crate::machine::WorkflowMachine::create_entity
    /// [`WorkflowStore::create`]: crate::store::WorkflowStore::create
    pub(crate) fn new(kind: WorkflowKind, initial: Status) -> Self {
        Self::with_id(&Uuid::new_v4().to_string(), kind, initial)
    }

    /// Create entity with a caller-supplied id
    pub(crate) fn with_id(id: &str, kind: WorkflowKind, initial: Status) -> Self {
        Self {
            id: id.to_string(),
            kind,
            status: initial.clone(),
            initial_status: initial,
            history: TransitionHistory::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &WorkflowKind {
        &self.kind
    }

    /// Live status
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn initial_status(&self) -> &Status {
        &self.initial_status
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Append an accepted transition and move to its target status
    ///
    /// Refuses records that do not start from the live status, so history
    /// and status can never disagree.
    pub fn apply(&mut self, record: TransitionRecord) -> GrcResult<&TransitionRecord> {
        if record.from_status != self.status {
            return Err(GrcError::Conflict(format!(
                "{} {} is '{}', transition starts from '{}'",
                self.kind, self.id, self.status, record.from_status
            )));
        }
        self.status = record.to_status.clone();
        Ok(&self.history.append(record).record)
    }

    /// Whether status and history agree
    pub fn is_consistent(&self) -> bool {
        match self.history.last() {
            Some(last) => last.to_status == self.status,
            None => self.status == self.initial_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use grc_common::ActorId;

    fn record(from: &str, to: &str) -> TransitionRecord {
        TransitionRecord {
            id: Uuid::new_v4().to_string(),
            from_status: from.into(),
            to_status: to.into(),
            actor: ActorId::new("owner").unwrap(),
            comment: "ok".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_new_entity_is_consistent() {
        let entity = WorkflowEntity::new(WorkflowKind::Document, "initial".into());
        assert_eq!(entity.status(), &Status::from("initial"));
        assert!(entity.history().is_empty());
        assert!(entity.is_consistent());
    }

    #[test]
    fn test_apply_updates_status_and_history() {
        let mut entity = WorkflowEntity::with_id("doc-1", WorkflowKind::Document, "initial".into());
        entity.apply(record("initial", "draft")).unwrap();
        entity.apply(record("draft", "under_review")).unwrap();

        assert_eq!(entity.status(), &Status::from("under_review"));
        assert_eq!(entity.history().len(), 2);
        assert!(entity.is_consistent());
        assert!(entity.history().verify_integrity().valid);
    }

    #[test]
    fn test_apply_rejects_stale_record() {
        let mut entity = WorkflowEntity::with_id("doc-1", WorkflowKind::Document, "initial".into());
        let err = entity.apply(record("draft", "under_review")).unwrap_err();
        assert!(matches!(err, GrcError::Conflict(_)));
        assert!(entity.history().is_empty());
        assert_eq!(entity.status(), &Status::from("initial"));
    }
}
