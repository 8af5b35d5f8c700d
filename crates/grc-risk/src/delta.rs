//! Risk Delta Analyzer
//!
//! Compares inherent and residual heatmap summaries.

use crate::classifier::RiskLevel;
use crate::heatmap::HeatmapStats;
use serde::{Deserialize, Serialize};

/// Per-level change between inherent and residual populations
///
/// Critical, High and Medium are `inherent - residual`: positive means fewer
/// risks at that severity once controls apply. Low is `residual - inherent`:
/// positive means more risks landed in the safe band. Both directions read as
/// "risk reduced" when positive, which is what the treatment dashboards show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDelta {
    pub critical_delta: i64,
    pub high_delta: i64,
    pub medium_delta: i64,
    pub low_delta: i64,
}

impl RiskDelta {
    /// Compute deltas between two summaries
    pub fn between(inherent: &HeatmapStats, residual: &HeatmapStats) -> Self {
        let diff = |a: usize, b: usize| a as i64 - b as i64;
        Self {
            critical_delta: diff(inherent.critical_count, residual.critical_count),
            high_delta: diff(inherent.high_count, residual.high_count),
            medium_delta: diff(inherent.medium_count, residual.medium_count),
            low_delta: diff(residual.low_count, inherent.low_count),
        }
    }

    /// Delta for one level
    pub fn get(&self, level: RiskLevel) -> i64 {
        match level {
            RiskLevel::Critical => self.critical_delta,
            RiskLevel::High => self.high_delta,
            RiskLevel::Medium => self.medium_delta,
            RiskLevel::Low => self.low_delta,
        }
    }

    /// Whether treatment moved nothing
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }

    /// Arrow badge for one level, e.g. `↓3`
    ///
    /// Arrows show the direction the count moved: down for fewer risks at a
    /// severe level, up for more risks in the Low band.
    pub fn indicator(&self, level: RiskLevel) -> String {
        let delta = self.get(level);
        let (positive, negative) = match level {
            RiskLevel::Low => ('↑', '↓'),
            _ => ('↓', '↑'),
        };
        if delta >= 0 {
            format!("{}{}", positive, delta)
        } else {
            format!("{}{}", negative, delta.unsigned_abs())
        }
    }
}

/// Compute deltas between inherent and residual summaries
pub fn delta(inherent: &HeatmapStats, residual: &HeatmapStats) -> RiskDelta {
    RiskDelta::between(inherent, residual)
}
