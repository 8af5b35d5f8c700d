//! In-memory workflow store
//!
//! Reading the live status, validating, appending history and writing the
//! new status all happen under one write lock, so two requests against the
//! same stale status cannot both succeed.

use crate::catalog::WorkflowKind;
use crate::entity::WorkflowEntity;
use crate::history::TransitionRecord;
use crate::machine::WorkflowMachine;
use grc_common::{GrcError, GrcResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Workflow entity store
pub struct WorkflowStore {
    machine: Arc<WorkflowMachine>,
    entities: Arc<RwLock<HashMap<String, WorkflowEntity>>>,
}

impl WorkflowStore {
    pub fn new(machine: Arc<WorkflowMachine>) -> Self {
        Self {
            machine,
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn machine(&self) -> &WorkflowMachine {
        &self.machine
    }

    /// Create and store an entity in its lifecycle's initial status
    pub fn create(&self, kind: WorkflowKind) -> GrcResult<WorkflowEntity> {
        let entity = self.machine.create_entity(kind)?;
        tracing::info!(kind = %entity.kind(), id = entity.id(), "Workflow entity created");
        self.entities.write().insert(entity.id().to_string(), entity.clone());
        Ok(entity)
    }

    /// Store an existing entity, e.g. one loaded from persistence
    ///
    /// The entity must pass [`WorkflowMachine::validate_entity`].
    pub fn insert(&self, entity: WorkflowEntity) -> GrcResult<()> {
        self.machine.validate_entity(&entity)?;
        self.entities.write().insert(entity.id().to_string(), entity);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<WorkflowEntity> {
        self.entities.read().get(id).cloned()
    }

    /// Entities of `kind` currently in `status`
    pub fn list_by_status(&self, kind: &WorkflowKind, status: &str) -> Vec<WorkflowEntity> {
        self.entities
            .read()
            .values()
            .filter(|e| e.kind() == kind && e.status() == status)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Move entity `id` from `expected` to `target`
    ///
    /// Fails with `Conflict` if another writer already moved the entity away
    /// from `expected`.
    pub fn transition(
        &self,
        id: &str,
        expected: &str,
        target: &str,
        actor: &str,
        comment: &str,
    ) -> GrcResult<TransitionRecord> {
        let mut entities = self.entities.write();
        let entity = entities
            .get_mut(id)
            .ok_or_else(|| GrcError::NotFound(format!("workflow entity {}", id)))?;
        self.machine.transition_expecting(entity, expected, target, actor, comment)
    }
}
