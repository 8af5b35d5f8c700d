//! Remediation gap tracking

use crate::catalog::{remediation, WorkflowKind};
use crate::entity::WorkflowEntity;
use crate::graph::Status;
use crate::history::TransitionRecord;
use crate::machine::WorkflowMachine;
use chrono::NaiveDate;
use grc_common::{GrcError, GrcResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Remediation tracker
pub struct RemediationTracker {
    machine: Arc<WorkflowMachine>,
    gaps: Arc<RwLock<HashMap<String, RemediationGap>>>,
}

impl RemediationTracker {
    pub fn new(machine: Arc<WorkflowMachine>) -> Self {
        Self {
            machine,
            gaps: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a gap, due after the priority's SLA
    pub fn create(
        &self,
        title: &str,
        control_id: &str,
        priority: Priority,
        owner: &str,
        opened_on: NaiveDate,
    ) -> GrcResult<String> {
        let initial = self
            .machine
            .catalog()
            .graph(&WorkflowKind::RemediationGap)?
            .initial()
            .clone();
        let due_date = opened_on
            .checked_add_signed(chrono::Duration::days(priority.sla_days()))
            .ok_or_else(|| {
                GrcError::validation(format!("due date out of range for gap opened on {}", opened_on))
            })?;
        let id = Uuid::new_v4().to_string();

        let gap = RemediationGap {
            id: id.clone(),
            title: title.to_string(),
            control_id: control_id.to_string(),
            priority,
            owner: owner.to_string(),
            due_date,
            workflow: WorkflowEntity::with_id(&id, WorkflowKind::RemediationGap, initial),
        };

        tracing::info!(gap_id = %id, control_id, ?priority, due = %gap.due_date, "Remediation gap opened");
        self.gaps.write().insert(id.clone(), gap);
        Ok(id)
    }

    /// Get gap
    pub fn get(&self, id: &str) -> Option<RemediationGap> {
        self.gaps.read().get(id).cloned()
    }

    /// Get all gaps
    pub fn all(&self) -> Vec<RemediationGap> {
        self.gaps.read().values().cloned().collect()
    }

    /// Move a gap through its lifecycle
    pub fn transition(
        &self,
        id: &str,
        expected: &str,
        target: &str,
        actor: &str,
        comment: &str,
    ) -> GrcResult<TransitionRecord> {
        let mut gaps = self.gaps.write();
        let gap = gaps
            .get_mut(id)
            .ok_or_else(|| GrcError::NotFound(format!("remediation gap {}", id)))?;
        self.machine
            .transition_expecting(&mut gap.workflow, expected, target, actor, comment)
    }

    /// Get overdue gaps
    pub fn overdue(&self, today: NaiveDate) -> Vec<RemediationGap> {
        self.gaps
            .read()
            .values()
            .filter(|g| g.is_overdue(today))
            .cloned()
            .collect()
    }

    /// Progress summary
    pub fn stats(&self, today: NaiveDate) -> RemediationStats {
        RemediationStats::from_gaps(self.gaps.read().values(), today)
    }
}

/// Remediation gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationGap {
    pub id: String,
    pub title: String,
    pub control_id: String,
    pub priority: Priority,
    pub owner: String,
    pub due_date: NaiveDate,
    pub workflow: WorkflowEntity,
}

impl RemediationGap {
    /// Live status
    pub fn status(&self) -> &Status {
        self.workflow.status()
    }

    /// Work is done (possibly awaiting verification or closure)
    pub fn is_complete(&self) -> bool {
        let status = self.status().as_str();
        status == remediation::COMPLETED || status == remediation::VERIFIED || status == remediation::CLOSED
    }

    /// Work is underway
    pub fn is_in_progress(&self) -> bool {
        let status = self.status().as_str();
        status == remediation::IN_PROGRESS || status == remediation::UNDER_REVIEW
    }

    /// Past due and still outstanding
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.is_complete() || self.status() == remediation::CANCELLED {
            return false;
        }
        self.due_date < today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Days allowed to close a gap of this priority
    pub fn sla_days(&self) -> i64 {
        match self {
            Self::Critical => 7,
            Self::High => 30,
            Self::Medium => 90,
            Self::Low => 180,
        }
    }
}

/// Remediation progress summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RemediationStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
    /// Percentage of gaps completed
    pub completion_rate: f64,
}

impl RemediationStats {
    pub fn from_gaps<'a>(gaps: impl IntoIterator<Item = &'a RemediationGap>, today: NaiveDate) -> Self {
        let mut stats = gaps.into_iter().fold(Self::default(), |mut s, gap| {
            s.total += 1;
            s.completed += gap.is_complete() as usize;
            s.in_progress += gap.is_in_progress() as usize;
            s.overdue += gap.is_overdue(today) as usize;
            s
        });
        if stats.total > 0 {
            stats.completion_rate = stats.completed as f64 / stats.total as f64 * 100.0;
        }
        stats
    }
}
