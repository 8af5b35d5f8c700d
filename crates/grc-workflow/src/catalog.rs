//! Workflow catalog
//!
//! Maps an entity-type tag to its transition graph. Adding a lifecycle is a
//! matter of registering another graph.

use crate::graph::{TransitionGraph, TransitionGraphDef};
use grc_common::{GrcError, GrcResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Document approval statuses
pub mod document {
    pub const INITIAL: &str = "initial";
    pub const DRAFT: &str = "draft";
    pub const UNDER_REVIEW: &str = "under_review";
    pub const REVIEWED: &str = "reviewed";
    pub const APPROVED: &str = "approved";
    pub const PUBLISHED: &str = "published";
    pub const ARCHIVED: &str = "archived";
    pub const CANCELLED: &str = "cancelled";
}

/// Remediation gap statuses
pub mod remediation {
    pub const OPEN: &str = "Open";
    pub const IN_PROGRESS: &str = "In Progress";
    pub const ON_HOLD: &str = "On Hold";
    pub const UNDER_REVIEW: &str = "Under Review";
    pub const COMPLETED: &str = "Completed";
    pub const VERIFIED: &str = "Verified";
    pub const CLOSED: &str = "Closed";
    pub const CANCELLED: &str = "Cancelled";
}

/// Finding statuses
pub mod finding {
    pub const OPEN: &str = "Open";
    pub const IN_PROGRESS: &str = "In Progress";
    pub const RESOLVED: &str = "Resolved";
    pub const CLOSED: &str = "Closed";
}

/// Entity type a lifecycle applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Document,
    RemediationGap,
    Finding,
    /// Lifecycle registered at runtime, e.g. contracts
    Custom(String),
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::RemediationGap => write!(f, "remediation_gap"),
            Self::Finding => write!(f, "finding"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Registry of lifecycles by entity type
#[derive(Debug, Clone, Default)]
pub struct WorkflowCatalog {
    graphs: HashMap<WorkflowKind, Arc<TransitionGraph>>,
}

impl WorkflowCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the document, remediation gap and finding lifecycles
    pub fn builtin() -> GrcResult<Self> {
        let mut catalog = Self::new();
        catalog.register(WorkflowKind::Document, document_graph()?);
        catalog.register(WorkflowKind::RemediationGap, remediation_graph()?);
        catalog.register(WorkflowKind::Finding, finding_graph()?);
        Ok(catalog)
    }

    /// Add or replace the lifecycle for `kind`
    pub fn register(&mut self, kind: WorkflowKind, graph: TransitionGraph) {
        tracing::info!(
            kind = %kind,
            states = graph.states().len(),
            "Registered workflow"
        );
        self.graphs.insert(kind, Arc::new(graph));
    }

    /// Register a lifecycle from its JSON definition
    pub fn register_json(&mut self, kind: WorkflowKind, json: &str) -> GrcResult<()> {
        let graph = TransitionGraph::try_from(TransitionGraphDef::from_json(json)?)?;
        self.register(kind, graph);
        Ok(())
    }

    /// Lifecycle for `kind`
    pub fn graph(&self, kind: &WorkflowKind) -> GrcResult<&TransitionGraph> {
        self.graphs
            .get(kind)
            .map(Arc::as_ref)
            .ok_or_else(|| GrcError::NotFound(format!("workflow for {}", kind)))
    }

    /// Registered kinds
    pub fn kinds(&self) -> impl Iterator<Item = &WorkflowKind> {
        self.graphs.keys()
    }
}

/// Document approval lifecycle
pub fn document_graph() -> GrcResult<TransitionGraph> {
    use self::document::*;
    TransitionGraph::builder(INITIAL)
        .state(INITIAL, &[DRAFT])
        .state(DRAFT, &[UNDER_REVIEW, CANCELLED])
        .state(UNDER_REVIEW, &[REVIEWED, DRAFT])
        .state(REVIEWED, &[APPROVED, DRAFT])
        .state(APPROVED, &[PUBLISHED, ARCHIVED])
        .state(PUBLISHED, &[ARCHIVED])
        .state(ARCHIVED, &[])
        .state(CANCELLED, &[DRAFT])
        .build()
}

/// Remediation gap lifecycle
pub fn remediation_graph() -> GrcResult<TransitionGraph> {
    use self::remediation::*;
    TransitionGraph::builder(OPEN)
        .state(OPEN, &[IN_PROGRESS, CANCELLED])
        .state(IN_PROGRESS, &[UNDER_REVIEW, ON_HOLD, OPEN])
        .state(ON_HOLD, &[IN_PROGRESS, CANCELLED])
        .state(UNDER_REVIEW, &[COMPLETED, IN_PROGRESS])
        .state(COMPLETED, &[VERIFIED, IN_PROGRESS])
        .state(VERIFIED, &[CLOSED])
        .state(CLOSED, &[])
        .state(CANCELLED, &[OPEN])
        .build()
}

/// Finding lifecycle
pub fn finding_graph() -> GrcResult<TransitionGraph> {
    use self::finding::*;
    TransitionGraph::builder(OPEN)
        .state(OPEN, &[IN_PROGRESS, CLOSED])
        .state(IN_PROGRESS, &[RESOLVED, OPEN])
        .state(RESOLVED, &[CLOSED, IN_PROGRESS])
        .state(CLOSED, &[OPEN])
        .build()
}
