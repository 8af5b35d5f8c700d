//! Heatmap Aggregator
//!
//! Buckets a risk population into a square likelihood x impact matrix.
//! Rows run from the highest likelihood down to 1 so that the most likely
//! risks render at the top; columns run from impact 1 up to `axis_size`.

use crate::classifier::{risk_level_from_score, score, RiskLevel};
use crate::model::Risk;
use grc_common::{EngineConfig, GrcError, GrcResult, OutOfRangePolicy, RatingScale};
use serde::{Deserialize, Serialize};

/// Which pair of ratings places a risk on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapView {
    /// Likelihood/impact before controls
    Inherent,
    /// Likelihood/impact after controls
    Residual,
}

impl HeatmapView {
    /// Grid coordinates of `risk` in this view
    ///
    /// `None` for the residual view when either residual rating is missing.
    pub fn coordinates(&self, risk: &Risk) -> Option<(u8, u8)> {
        match self {
            Self::Inherent => Some((risk.likelihood, risk.impact)),
            Self::Residual => risk.residual(),
        }
    }
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub likelihood: u8,
    pub impact: u8,
    /// Level of the coordinate itself, set even when the cell is empty
    pub level: RiskLevel,
    pub risk_ids: Vec<String>,
}

impl HeatmapCell {
    fn new(likelihood: u8, impact: u8) -> Self {
        Self {
            likelihood,
            impact,
            level: risk_level_from_score(score(likelihood, impact)),
            risk_ids: Vec::new(),
        }
    }

    /// Number of risks in the cell
    pub fn count(&self) -> usize {
        self.risk_ids.len()
    }

    /// Score of the coordinate
    pub fn score(&self) -> u32 {
        score(self.likelihood, self.impact)
    }
}

/// Risk counts per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapStats {
    pub total_risks: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
}

impl HeatmapStats {
    /// Count for a single level
    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Critical => self.critical_count,
            RiskLevel::High => self.high_count,
            RiskLevel::Medium => self.medium_count,
            RiskLevel::Low => self.low_count,
        }
    }

    fn record(&mut self, level: RiskLevel, n: usize) {
        self.total_risks += n;
        match level {
            RiskLevel::Critical => self.critical_count += n,
            RiskLevel::High => self.high_count += n,
            RiskLevel::Medium => self.medium_count += n,
            RiskLevel::Low => self.low_count += n,
        }
    }
}

/// Likelihood x impact matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    axis_size: u8,
    view: HeatmapView,
    rows: Vec<Vec<HeatmapCell>>,
    excluded: Vec<String>,
}

impl Heatmap {
    /// Build a heatmap honouring the configured out-of-range policy
    pub fn build(risks: &[Risk], config: &EngineConfig, view: HeatmapView) -> GrcResult<Self> {
        let scale = config.scale()?;
        match config.out_of_range {
            OutOfRangePolicy::Reject => {
                validate_ratings(risks, scale, view)?;
                Ok(aggregate(risks, scale, view, false))
            }
            OutOfRangePolicy::Exclude => Ok(aggregate(risks, scale, view, false)),
            OutOfRangePolicy::Clamp => Ok(aggregate(risks, scale, view, true)),
        }
    }

    /// Side length of the matrix
    pub fn axis_size(&self) -> u8 {
        self.axis_size
    }

    /// View the matrix was built for
    pub fn view(&self) -> HeatmapView {
        self.view
    }

    /// Rows, highest likelihood first
    pub fn rows(&self) -> &[Vec<HeatmapCell>] {
        &self.rows
    }

    /// Consume into rows
    pub fn into_rows(self) -> Vec<Vec<HeatmapCell>> {
        self.rows
    }

    /// Ids of risks left out because a rating fell outside the scale
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Cell at a coordinate
    pub fn cell(&self, likelihood: u8, impact: u8) -> Option<&HeatmapCell> {
        if likelihood == 0 || impact == 0 || likelihood > self.axis_size || impact > self.axis_size {
            return None;
        }
        let row = (self.axis_size - likelihood) as usize;
        self.rows.get(row)?.get(impact as usize - 1)
    }

    /// All cells in display order
    pub fn cells(&self) -> impl Iterator<Item = &HeatmapCell> {
        self.rows.iter().flatten()
    }

    /// Summary counts per level
    pub fn stats(&self) -> HeatmapStats {
        self.cells().fold(HeatmapStats::default(), |mut stats, cell| {
            stats.record(cell.level, cell.count());
            stats
        })
    }
}

/// Build a heatmap, silently skipping risks whose ratings fall outside
/// `1..=axis_size`
///
/// Skipped ids are still listed in [`Heatmap::excluded`].
pub fn build_heatmap(risks: &[Risk], axis_size: u8, use_residual: bool) -> Heatmap {
    let view = if use_residual { HeatmapView::Residual } else { HeatmapView::Inherent };
    match RatingScale::new(axis_size) {
        Ok(scale) => aggregate(risks, scale, view, false),
        Err(_) => Heatmap {
            axis_size: 0,
            view,
            rows: Vec::new(),
            excluded: risks
                .iter()
                .filter(|r| view.coordinates(r).is_some())
                .map(|r| r.id.clone())
                .collect(),
        },
    }
}

fn validate_ratings(risks: &[Risk], scale: RatingScale, view: HeatmapView) -> GrcResult<()> {
    for risk in risks {
        if let Some((l, i)) = view.coordinates(risk) {
            scale
                .check("likelihood", l)
                .and_then(|_| scale.check("impact", i))
                .map_err(|e| GrcError::Validation(format!("risk {}: {}", risk.id, e)))?;
        }
    }
    Ok(())
}

fn aggregate(risks: &[Risk], scale: RatingScale, view: HeatmapView, clamp: bool) -> Heatmap {
    let axis = scale.max();
    let mut rows: Vec<Vec<HeatmapCell>> = (1..=axis)
        .rev()
        .map(|l| (1..=axis).map(|i| HeatmapCell::new(l, i)).collect())
        .collect();
    let mut excluded = Vec::new();

    for risk in risks {
        let Some((l, i)) = view.coordinates(risk) else {
            continue;
        };
        let (l, i) = if scale.contains(l) && scale.contains(i) {
            (l, i)
        } else if clamp {
            (scale.clamp(l), scale.clamp(i))
        } else {
            excluded.push(risk.id.clone());
            continue;
        };
        rows[(axis - l) as usize][(i - 1) as usize].risk_ids.push(risk.id.clone());
    }

    if !excluded.is_empty() {
        tracing::warn!(
            view = ?view,
            axis_size = axis,
            excluded = excluded.len(),
            "Risks with out-of-range ratings left off heatmap"
        );
    }
    tracing::debug!(view = ?view, risks = risks.len(), "Built {}x{} heatmap", axis, axis);

    Heatmap {
        axis_size: axis,
        view,
        rows,
        excluded,
    }
}
