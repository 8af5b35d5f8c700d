//! Workflow State Machine
//!
//! Validates status changes against the catalog and produces transition
//! records. Holds no entity state of its own.

use crate::catalog::{WorkflowCatalog, WorkflowKind};
use crate::entity::WorkflowEntity;
use crate::graph::Status;
use crate::history::TransitionRecord;
use chrono::{DateTime, Utc};
use grc_common::{ActorId, GrcError, GrcResult};
use uuid::Uuid;

/// State machine over a workflow catalog
#[derive(Debug, Clone)]
pub struct WorkflowMachine {
    catalog: WorkflowCatalog,
}

impl WorkflowMachine {
    pub fn new(catalog: WorkflowCatalog) -> Self {
        Self { catalog }
    }

    /// Machine with the built-in lifecycles
    pub fn builtin() -> GrcResult<Self> {
        Ok(Self::new(WorkflowCatalog::builtin()?))
    }

    pub fn catalog(&self) -> &WorkflowCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut WorkflowCatalog {
        &mut self.catalog
    }

    /// New entity of `kind` at its lifecycle's initial status
    pub fn create_entity(&self, kind: WorkflowKind) -> GrcResult<WorkflowEntity> {
        let initial = self.catalog.graph(&kind)?.initial().clone();
        Ok(WorkflowEntity::new(kind, initial))
    }

    /// Check that an entity, e.g. one loaded from persistence, belongs to its
    /// lifecycle
    ///
    /// The entity must start at the lifecycle's initial status, every recorded
    /// step must be an edge of the lifecycle, the live status must agree with
    /// history and the hash chain must verify.
    pub fn validate_entity(&self, entity: &WorkflowEntity) -> GrcResult<()> {
        let graph = self.catalog.graph(entity.kind())?;
        let invalid = |reason: String| {
            GrcError::Validation(format!("{} {}: {}", entity.kind(), entity.id(), reason))
        };

        if entity.initial_status() != graph.initial() {
            return Err(invalid(format!(
                "starts at '{}', lifecycle starts at '{}'",
                entity.initial_status(),
                graph.initial()
            )));
        }
        if !graph.contains(entity.status().as_str()) {
            return Err(invalid(format!("status '{}' is not in the lifecycle", entity.status())));
        }

        let mut expected_from = entity.initial_status();
        for record in entity.history().records() {
            if &record.from_status != expected_from {
                return Err(invalid(format!(
                    "history jumps from '{}' to '{}'",
                    expected_from, record.from_status
                )));
            }
            if !graph.can_transition(record.from_status.as_str(), record.to_status.as_str()) {
                return Err(invalid(format!(
                    "history records '{}' -> '{}', which the lifecycle does not allow",
                    record.from_status, record.to_status
                )));
            }
            expected_from = &record.to_status;
        }

        if !entity.is_consistent() || !entity.history().verify_integrity().valid {
            return Err(invalid("inconsistent history".to_string()));
        }
        Ok(())
    }

    /// Statuses `current` may move to
    pub fn allowed_transitions(&self, kind: &WorkflowKind, current: &str) -> GrcResult<&[Status]> {
        Ok(self.catalog.graph(kind)?.allowed_transitions(current))
    }

    /// Validate a transition and build its record, timestamped now
    pub fn attempt_transition(
        &self,
        kind: &WorkflowKind,
        current: &str,
        target: &str,
        actor: &str,
        comment: &str,
    ) -> GrcResult<TransitionRecord> {
        self.attempt_transition_at(kind, current, target, actor, comment, Utc::now())
    }

    /// Validate a transition and build its record
    ///
    /// Checks, in order: the lifecycle exists, `target` is reachable from
    /// `current`, the actor is named, and a comment is given when the
    /// lifecycle requires one.
    pub fn attempt_transition_at(
        &self,
        kind: &WorkflowKind,
        current: &str,
        target: &str,
        actor: &str,
        comment: &str,
        at: DateTime<Utc>,
    ) -> GrcResult<TransitionRecord> {
        let graph = self.catalog.graph(kind)?;

        if !graph.can_transition(current, target) {
            tracing::warn!(kind = %kind, from = current, to = target, "Rejected transition");
            return Err(GrcError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        let actor = ActorId::new(actor)?;
        if graph.requires_comment() && comment.trim().is_empty() {
            return Err(GrcError::validation("a comment is required to change status"));
        }

        tracing::debug!(kind = %kind, from = current, to = target, actor = %actor, "Accepted transition");

        Ok(TransitionRecord {
            id: Uuid::new_v4().to_string(),
            from_status: Status::from(current),
            to_status: Status::from(target),
            actor,
            comment: comment.trim().to_string(),
            timestamp: at,
        })
    }

    /// Validate against the entity's live status and apply in one step
    pub fn transition(
        &self,
        entity: &mut WorkflowEntity,
        target: &str,
        actor: &str,
        comment: &str,
    ) -> GrcResult<TransitionRecord> {
        let record = self.attempt_transition(entity.kind(), entity.status().as_str(), target, actor, comment)?;
        entity.apply(record).cloned()
    }

    /// Like [`transition`](Self::transition), but first confirms the caller
    /// saw the entity in `expected` status
    pub fn transition_expecting(
        &self,
        entity: &mut WorkflowEntity,
        expected: &str,
        target: &str,
        actor: &str,
        comment: &str,
    ) -> GrcResult<TransitionRecord> {
        if entity.status() != expected {
            return Err(GrcError::Conflict(format!(
                "{} {} is now '{}', not '{}'",
                entity.kind(),
                entity.id(),
                entity.status(),
                expected
            )));
        }
        self.transition(entity, target, actor, comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{document, remediation};
    use proptest::prelude::*;

    fn machine() -> WorkflowMachine {
        WorkflowMachine::builtin().unwrap()
    }

    #[test]
    fn test_draft_allowed_transitions() {
        let allowed = machine().allowed_transitions(&WorkflowKind::Document, "draft").unwrap().to_vec();
        assert_eq!(allowed, vec![Status::from("under_review"), Status::from("cancelled")]);
    }

    #[test]
    fn test_archived_is_terminal() {
        let m = machine();
        assert!(m.allowed_transitions(&WorkflowKind::Document, "archived").unwrap().is_empty());
        for target in ["draft", "published", "archived", "initial", ""] {
            let err = m
                .attempt_transition(&WorkflowKind::Document, "archived", target, "alice", "why")
                .unwrap_err();
            assert!(err.is_invalid_transition());
        }
    }

    #[test]
    fn test_draft_to_published_rejected() {
        let err = machine()
            .attempt_transition(&WorkflowKind::Document, "draft", "published", "alice", "skip review")
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot move from 'draft' to 'published'");
    }

    #[test]
    fn test_empty_comment_rejected() {
        let m = machine();
        for comment in ["", "   ", "\n"] {
            let err = m
                .attempt_transition(&WorkflowKind::Document, "draft", "under_review", "alice", comment)
                .unwrap_err();
            assert!(matches!(err, GrcError::Validation(_)));
        }
    }

    #[test]
    fn test_empty_actor_rejected() {
        let err = machine()
            .attempt_transition(&WorkflowKind::Document, "draft", "under_review", " ", "ready")
            .unwrap_err();
        assert!(matches!(err, GrcError::Validation(_)));
    }

    #[test]
    fn test_unknown_workflow() {
        let err = machine()
            .attempt_transition(&WorkflowKind::Custom("contract".into()), "a", "b", "alice", "x")
            .unwrap_err();
        assert!(matches!(err, GrcError::NotFound(_)));
    }

    #[test]
    fn test_record_fields() {
        let at = Utc::now();
        let record = machine()
            .attempt_transition_at(&WorkflowKind::Document, "draft", "under_review", "alice", " ready ", at)
            .unwrap();
        assert_eq!(record.from_status, "draft");
        assert_eq!(record.to_status, "under_review");
        assert_eq!(record.actor.as_str(), "alice");
        assert_eq!(record.comment, "ready");
        assert_eq!(record.timestamp, at);
    }

    #[test]
    fn test_transition_appends_one_record() {
        let m = machine();
        let mut entity = WorkflowEntity::new(WorkflowKind::Document, document::DRAFT.into());
        let record = m.transition(&mut entity, document::UNDER_REVIEW, "alice", "ready for review").unwrap();

        assert_eq!(entity.history().len(), 1);
        assert_eq!(entity.history().last(), Some(&record));
        assert_eq!(record.from_status, "draft");
        assert_eq!(entity.status(), &Status::from("under_review"));
    }

    #[test]
    fn test_failed_transition_leaves_entity_untouched() {
        let m = machine();
        let mut entity = WorkflowEntity::new(WorkflowKind::Document, document::DRAFT.into());
        assert!(m.transition(&mut entity, document::PUBLISHED, "alice", "now").is_err());
        assert!(entity.history().is_empty());
        assert_eq!(entity.status(), &Status::from("draft"));
    }

    #[test]
    fn test_full_document_lifecycle() {
        let m = machine();
        let mut entity = WorkflowEntity::new(WorkflowKind::Document, document::INITIAL.into());
        for target in [
            document::DRAFT,
            document::UNDER_REVIEW,
            document::DRAFT,
            document::UNDER_REVIEW,
            document::REVIEWED,
            document::APPROVED,
            document::PUBLISHED,
            document::ARCHIVED,
        ] {
            m.transition(&mut entity, target, "owner", "step").unwrap();
        }
        assert_eq!(entity.history().len(), 8);
        assert!(entity.is_consistent());
        assert!(entity.history().verify_integrity().valid);
        assert!(m.catalog().graph(entity.kind()).unwrap().is_terminal(entity.status().as_str()));
    }

    #[test]
    fn test_transition_expecting_stale_status() {
        let m = machine();
        let mut entity = WorkflowEntity::new(WorkflowKind::RemediationGap, remediation::OPEN.into());
        m.transition(&mut entity, remediation::IN_PROGRESS, "bob", "started").unwrap();

        let err = m
            .transition_expecting(&mut entity, remediation::OPEN, remediation::CANCELLED, "bob", "dup")
            .unwrap_err();
        assert!(matches!(err, GrcError::Conflict(_)));
        assert_eq!(entity.history().len(), 1);
    }

    #[test]
    fn test_custom_lifecycle_without_comment() {
        let mut m = machine();
        let kind = WorkflowKind::Custom("contract".into());
        m.catalog_mut()
            .register_json(
                kind.clone(),
                r#"{"initial": "Draft", "require_comment": false, "transitions": {"Draft": ["Active"], "Active": []}}"#,
            )
            .unwrap();

        let record = m.attempt_transition(&kind, "Draft", "Active", "legal", "").unwrap();
        assert_eq!(record.to_status, "Active");
    }

    const DOCUMENT_STATUSES: [&str; 8] = [
        document::INITIAL,
        document::DRAFT,
        document::UNDER_REVIEW,
        document::REVIEWED,
        document::APPROVED,
        document::PUBLISHED,
        document::ARCHIVED,
        document::CANCELLED,
    ];

    #[test]
    fn test_create_entity_starts_at_initial() {
        let machine = machine();
        let entity = machine.create_entity(WorkflowKind::RemediationGap).unwrap();
        assert_eq!(entity.status(), &Status::from(remediation::OPEN));
        assert!(machine.validate_entity(&entity).is_ok());
        assert!(matches!(
            machine.create_entity(WorkflowKind::Custom("vendor".into())),
            Err(GrcError::NotFound(_))
        ));
    }

    #[test]
    fn test_validate_entity_rejects_foreign_status() {
        let machine = machine();
        let foreign = WorkflowEntity::new(WorkflowKind::Document, remediation::OPEN.into());
        assert!(matches!(machine.validate_entity(&foreign), Err(GrcError::Validation(_))));
    }

    #[test]
    fn test_validate_entity_rejects_illegal_recorded_step() {
        let machine = machine();
        let mut entity = WorkflowEntity::new(WorkflowKind::Document, document::INITIAL.into());
        let record = TransitionRecord {
            id: Uuid::new_v4().to_string(),
            from_status: document::INITIAL.into(),
            to_status: document::PUBLISHED.into(),
            actor: ActorId::new("alice").unwrap(),
            comment: "skipped review".into(),
            timestamp: Utc::now(),
        };
        entity.apply(record).unwrap();

        assert!(entity.is_consistent());
        assert!(entity.history().verify_integrity().valid);
        let err = machine.validate_entity(&entity).unwrap_err();
        assert!(matches!(err, GrcError::Validation(ref m) if m.contains("does not allow")));
    }

    proptest! {
        #[test]
        fn prop_random_requests_keep_entity_consistent(targets in proptest::collection::vec(0usize..8, 0..40)) {
            let m = machine();
            let graph = m.catalog().graph(&WorkflowKind::Document).unwrap().clone();
            let mut entity = WorkflowEntity::new(WorkflowKind::Document, document::INITIAL.into());

            for t in targets {
                let target = DOCUMENT_STATUSES[t];
                let before = entity.status().clone();
                let accepted = m.transition(&mut entity, target, "fuzz", "step").is_ok();
                prop_assert_eq!(accepted, graph.can_transition(before.as_str(), target));
            }

            prop_assert!(entity.is_consistent());
            prop_assert!(entity.history().verify_integrity().valid);
        }
    }
}
