//! GRC Risk Engine
//!
//! Risk quantification and aggregation shared by every risk screen.
//!
//! # Components
//!
//! - **Classifier**: likelihood x impact score to qualitative band, plus the
//!   separate control-risk banding
//! - **Heatmap**: buckets a risk population into a likelihood x impact grid
//! - **Delta**: compares inherent and residual summaries
//! - **Register**: in-memory risk collection
//!
//! # Data Flow
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ RiskRegister │───▶│   Heatmap    │───▶│  RiskDelta   │
//! │  (inherent + │    │  inherent /  │    │  ↓N / ↑N     │
//! │   residual)  │    │  residual    │    │              │
//! └──────────────┘    └──────┬───────┘    └──────────────┘
//!                            │
//!                     ┌──────▼───────┐
//!                     │  Classifier  │
//!                     └──────────────┘
//! ```

#![warn(missing_docs)]

pub mod classifier;
pub mod delta;
pub mod heatmap;
pub mod model;
pub mod register;

use grc_common::{EngineConfig, GrcResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use classifier::{
    control_risk_level_from_score, rating_label, risk_level_from_score, ControlRiskLevel, RiskLevel,
};
pub use delta::{delta, RiskDelta};
pub use heatmap::{build_heatmap, Heatmap, HeatmapCell, HeatmapStats, HeatmapView};
pub use model::Risk;
pub use register::RiskRegister;

/// Main risk engine
pub struct RiskEngine {
    /// Engine configuration
    pub config: EngineConfig,
    /// Risk register
    pub register: Arc<RiskRegister>,
}

impl RiskEngine {
    /// Create engine with validated configuration
    pub fn new(config: EngineConfig) -> GrcResult<Self> {
        config.validate()?;
        tracing::info!(
            axis_size = config.axis_size,
            policy = ?config.out_of_range,
            "Risk engine initialised"
        );
        Ok(Self {
            config,
            register: Arc::new(RiskRegister::new()),
        })
    }

    /// Heatmap of the register before controls
    pub fn inherent_heatmap(&self) -> GrcResult<Heatmap> {
        Heatmap::build(&self.register.all(), &self.config, HeatmapView::Inherent)
    }

    /// Heatmap of the register after controls
    pub fn residual_heatmap(&self) -> GrcResult<Heatmap> {
        Heatmap::build(&self.register.all(), &self.config, HeatmapView::Residual)
    }

    /// Inherent summary of the register on the configured grid
    pub fn summary(&self) -> GrcResult<HeatmapStats> {
        Ok(self.inherent_heatmap()?.stats())
    }

    /// Inherent vs residual comparison over one snapshot of the register
    pub fn treatment_analysis(&self) -> GrcResult<TreatmentAnalysis> {
        let risks = self.register.all();
        let inherent = Heatmap::build(&risks, &self.config, HeatmapView::Inherent)?.stats();
        let residual = Heatmap::build(&risks, &self.config, HeatmapView::Residual)?.stats();
        let delta = RiskDelta::between(&inherent, &residual);

        tracing::debug!(
            inherent = inherent.total_risks,
            residual = residual.total_risks,
            critical_delta = delta.critical_delta,
            "Treatment analysis computed"
        );

        Ok(TreatmentAnalysis { inherent, residual, delta })
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            register: Arc::new(RiskRegister::new()),
        }
    }
}

/// Inherent vs residual summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentAnalysis {
    pub inherent: HeatmapStats,
    pub residual: HeatmapStats,
    pub delta: RiskDelta,
}
