//! Risk record as consumed by the engine

use crate::classifier::{risk_level_from_score, score, RiskLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk
///
/// A narrowed view of the persisted risk record. Score and level are always
/// derived from the ratings, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: String,
    pub title: String,
    pub likelihood: u8,
    pub impact: u8,
    #[serde(default)]
    pub residual_likelihood: Option<u8>,
    #[serde(default)]
    pub residual_impact: Option<u8>,
}

impl Risk {
    /// Create new risk with a generated id
    pub fn new(title: &str, likelihood: u8, impact: u8) -> Self {
        Self::with_id(&Uuid::new_v4().to_string(), title, likelihood, impact)
    }

    /// Create risk with a caller-supplied id
    pub fn with_id(id: &str, title: &str, likelihood: u8, impact: u8) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            likelihood,
            impact,
            residual_likelihood: None,
            residual_impact: None,
        }
    }

    /// Set residual ratings
    pub fn with_residual(mut self, likelihood: u8, impact: u8) -> Self {
        self.residual_likelihood = Some(likelihood);
        self.residual_impact = Some(impact);
        self
    }

    /// Inherent score
    pub fn score(&self) -> u32 {
        score(self.likelihood, self.impact)
    }

    /// Inherent level
    pub fn level(&self) -> RiskLevel {
        risk_level_from_score(self.score())
    }

    /// Residual ratings, only when both are set
    pub fn residual(&self) -> Option<(u8, u8)> {
        self.residual_likelihood.zip(self.residual_impact)
    }

    /// Whether residual analysis applies to this risk
    pub fn has_residual(&self) -> bool {
        self.residual().is_some()
    }

    /// Residual score
    pub fn residual_score(&self) -> Option<u32> {
        self.residual().map(|(l, i)| score(l, i))
    }

    /// Residual level
    pub fn residual_level(&self) -> Option<RiskLevel> {
        self.residual_score().map(risk_level_from_score)
    }
}
