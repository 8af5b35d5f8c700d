//! Risk Classifier
//!
//! Two banding tables live here and must not be swapped for each other:
//!
//! | Score | [`RiskLevel`] | [`ControlRiskLevel`] |
//! |-------|---------------|----------------------|
//! | 0-4   | Low           | Very Low             |
//! | 5-9   | Medium        | Low                  |
//! | 10-14 | High          | Medium               |
//! | 15-19 | Critical      | High                 |
//! | 20+   | Critical      | Critical             |
//!
//! Lower bounds are inclusive: a score of exactly 15 is Critical.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative band of a raw likelihood x impact score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// All levels, least severe first
    pub const ALL: [RiskLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band of a control risk score (control-effectiveness assessments only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlRiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl ControlRiskLevel {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for ControlRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Likelihood x impact product
#[inline]
pub fn score(likelihood: u8, impact: u8) -> u32 {
    likelihood as u32 * impact as u32
}

/// Classify a raw risk score
///
/// Total over all scores; callers are responsible for passing ratings from
/// a valid scale.
pub fn risk_level_from_score(score: u32) -> RiskLevel {
    match score {
        s if s >= 15 => RiskLevel::Critical,
        s if s >= 10 => RiskLevel::High,
        s if s >= 5 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Classify a control risk score
pub fn control_risk_level_from_score(score: u32) -> ControlRiskLevel {
    match score {
        s if s >= 20 => ControlRiskLevel::Critical,
        s if s >= 15 => ControlRiskLevel::High,
        s if s >= 10 => ControlRiskLevel::Medium,
        s if s >= 5 => ControlRiskLevel::Low,
        _ => ControlRiskLevel::VeryLow,
    }
}

/// Label for a rating on the 1-5 scale
pub fn rating_label(value: u8) -> Option<&'static str> {
    match value {
        1 => Some("Very Low"),
        2 => Some("Low"),
        3 => Some("Medium"),
        4 => Some("High"),
        5 => Some("Very High"),
        _ => None,
    }
}
