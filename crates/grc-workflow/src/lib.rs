//! GRC Workflow Engine
//!
//! Generic status lifecycles for documents, remediation gaps, findings and
//! any entity type registered at runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      WORKFLOW ENGINE                         │
//! │                                                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐        │
//! │  │   Document   │  │ Remediation  │  │   Finding    │  ...   │
//! │  │   approval   │  │     gap      │  │              │        │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘        │
//! │         └─────────────────┼─────────────────┘                │
//! │                  ┌────────▼─────────┐                        │
//! │                  │ WorkflowCatalog  │  kind -> graph         │
//! │                  └────────┬─────────┘                        │
//! │                  ┌────────▼─────────┐                        │
//! │                  │ WorkflowMachine  │  validate, record      │
//! │                  └────────┬─────────┘                        │
//! │  ┌──────────────┐  ┌──────▼───────┐  ┌──────────────┐        │
//! │  │  Transition  │◀─│   Workflow   │─▶│  Workflow    │        │
//! │  │   History    │  │    Entity    │  │    Store     │        │
//! │  │ (Hash Chain) │  │              │  │ (one lock)   │        │
//! │  └──────────────┘  └──────────────┘  └──────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod entity;
pub mod graph;
pub mod history;
pub mod machine;
pub mod remediation;
pub mod store;

pub use catalog::{WorkflowCatalog, WorkflowKind};
pub use entity::WorkflowEntity;
pub use graph::{Status, TransitionGraph, TransitionGraphBuilder, TransitionGraphDef};
pub use history::{HistoryEntry, IntegrityResult, TransitionHistory, TransitionRecord};
pub use machine::WorkflowMachine;
pub use remediation::{Priority, RemediationGap, RemediationStats, RemediationTracker};
pub use store::WorkflowStore;
