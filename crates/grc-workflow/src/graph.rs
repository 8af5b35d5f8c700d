//! Transition graphs
//!
//! A graph is plain data: a set of statuses, the status new entities start
//! in, and for each status the statuses it may move to. The state machine
//! never hard-codes a lifecycle.

use grc_common::{GrcError, GrcResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Workflow status
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Status {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Status {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Status {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Directed status graph for one entity type
///
/// # Invariants
/// - The initial status is a declared state
/// - Every transition target is a declared state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionGraph {
    initial: Status,
    require_comment: bool,
    states: Vec<Status>,
    edges: HashMap<Status, Vec<Status>>,
}

impl TransitionGraph {
    /// Start building a graph whose entities begin in `initial`
    pub fn builder(initial: impl Into<Status>) -> TransitionGraphBuilder {
        TransitionGraphBuilder {
            initial: initial.into(),
            require_comment: true,
            states: Vec::new(),
        }
    }

    /// Status new entities start in
    pub fn initial(&self) -> &Status {
        &self.initial
    }

    /// Whether every transition needs a justification comment
    pub fn requires_comment(&self) -> bool {
        self.require_comment
    }

    /// Declared statuses in declaration order
    pub fn states(&self) -> &[Status] {
        &self.states
    }

    /// Whether `status` belongs to this lifecycle
    pub fn contains(&self, status: &str) -> bool {
        self.edges.contains_key(status)
    }

    /// Statuses reachable in one step from `current`
    ///
    /// Unknown statuses have no outgoing transitions.
    pub fn allowed_transitions(&self, current: &str) -> &[Status] {
        self.edges.get(current).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `current -> target` is an edge
    pub fn can_transition(&self, current: &str, target: &str) -> bool {
        self.allowed_transitions(current).iter().any(|s| s == target)
    }

    /// Whether `status` has no way out
    pub fn is_terminal(&self, status: &str) -> bool {
        self.allowed_transitions(status).is_empty()
    }

    /// Serializable form of this graph
    pub fn to_def(&self) -> TransitionGraphDef {
        TransitionGraphDef {
            initial: self.initial.to_string(),
            require_comment: self.require_comment,
            transitions: self
                .states
                .iter()
                .map(|s| {
                    let targets = self.allowed_transitions(s.as_str()).iter().map(Status::to_string).collect();
                    (s.to_string(), targets)
                })
                .collect(),
        }
    }
}

/// Builder for [`TransitionGraph`]
#[derive(Debug, Clone)]
pub struct TransitionGraphBuilder {
    initial: Status,
    require_comment: bool,
    states: Vec<(Status, Vec<Status>)>,
}

impl TransitionGraphBuilder {
    /// Declare a status and the statuses it may move to
    pub fn state(mut self, status: &str, targets: &[&str]) -> Self {
        self.states
            .push((Status::from(status), targets.iter().map(|t| Status::from(*t)).collect()));
        self
    }

    /// Whether transitions need a justification comment (default `true`)
    pub fn require_comment(mut self, required: bool) -> Self {
        self.require_comment = required;
        self
    }

    /// Validate and build
    pub fn build(self) -> GrcResult<TransitionGraph> {
        let mut states = Vec::with_capacity(self.states.len());
        let mut edges: HashMap<Status, Vec<Status>> = HashMap::with_capacity(self.states.len());

        for (status, targets) in self.states {
            if edges.contains_key(&status) {
                return Err(GrcError::Config(format!("status '{}' declared twice", status)));
            }
            states.push(status.clone());
            edges.insert(status, targets);
        }

        if !edges.contains_key(&self.initial) {
            return Err(GrcError::Config(format!(
                "initial status '{}' is not a declared status",
                self.initial
            )));
        }
        for (from, targets) in &edges {
            if let Some(unknown) = targets.iter().find(|t| !edges.contains_key(*t)) {
                return Err(GrcError::Config(format!(
                    "transition '{}' -> '{}' targets an undeclared status",
                    from, unknown
                )));
            }
        }

        Ok(TransitionGraph {
            initial: self.initial,
            require_comment: self.require_comment,
            states,
            edges,
        })
    }
}

/// Configuration form of a graph
///
/// ```json
/// {
///   "initial": "Open",
///   "require_comment": true,
///   "transitions": { "Open": ["Closed"], "Closed": [] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionGraphDef {
    pub initial: String,
    #[serde(default = "default_require_comment")]
    pub require_comment: bool,
    pub transitions: BTreeMap<String, Vec<String>>,
}

fn default_require_comment() -> bool {
    true
}

impl TransitionGraphDef {
    /// Parse from JSON
    pub fn from_json(json: &str) -> GrcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<TransitionGraphDef> for TransitionGraph {
    type Error = GrcError;

    fn try_from(def: TransitionGraphDef) -> GrcResult<Self> {
        let mut builder = TransitionGraph::builder(def.initial).require_comment(def.require_comment);
        for (status, targets) in &def.transitions {
            let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
            builder = builder.state(status, &targets);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> TransitionGraph {
        TransitionGraph::builder("open")
            .state("open", &["working", "closed"])
            .state("working", &["closed", "open"])
            .state("closed", &[])
            .build()
            .unwrap()
    }

    #[test]
    fn test_allowed_transitions_in_declared_order() {
        let graph = simple();
        assert_eq!(graph.allowed_transitions("open"), &[Status::from("working"), Status::from("closed")]);
        assert_eq!(graph.allowed_transitions("working")[1], "open");
    }

    #[test]
    fn test_unknown_status_has_no_transitions() {
        let graph = simple();
        assert!(graph.allowed_transitions("nonsense").is_empty());
        assert!(!graph.contains("nonsense"));
        assert!(!graph.can_transition("nonsense", "open"));
    }

    #[test]
    fn test_terminal() {
        let graph = simple();
        assert!(graph.is_terminal("closed"));
        assert!(!graph.is_terminal("open"));
    }

    #[test]
    fn test_build_rejects_undeclared_target() {
        let err = TransitionGraph::builder("a").state("a", &["b"]).build().unwrap_err();
        assert!(matches!(err, GrcError::Config(ref m) if m.contains("'a' -> 'b'")));
    }

    #[test]
    fn test_build_rejects_undeclared_initial() {
        let err = TransitionGraph::builder("z").state("a", &[]).build().unwrap_err();
        assert!(matches!(err, GrcError::Config(_)));
    }

    #[test]
    fn test_build_rejects_duplicate_state() {
        let result = TransitionGraph::builder("a").state("a", &[]).state("a", &["a"]).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_def_json() {
        let def = TransitionGraphDef::from_json(
            r#"{"initial": "Draft", "transitions": {"Draft": ["Signed"], "Signed": ["Expired"], "Expired": []}}"#,
        )
        .unwrap();
        assert!(def.require_comment);

        let graph = TransitionGraph::try_from(def).unwrap();
        assert_eq!(graph.initial(), &Status::from("Draft"));
        assert!(graph.can_transition("Draft", "Signed"));
        assert!(graph.is_terminal("Expired"));
    }

    #[test]
    fn test_def_round_trips_edges() {
        let graph = simple();
        let rebuilt = TransitionGraph::try_from(graph.to_def()).unwrap();
        for state in graph.states() {
            assert_eq!(
                graph.allowed_transitions(state.as_str()),
                rebuilt.allowed_transitions(state.as_str())
            );
        }
    }
}
