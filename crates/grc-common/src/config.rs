//! Engine configuration

use crate::error::{GrcError, GrcResult};
use crate::value_objects::RatingScale;
use serde::{Deserialize, Serialize};

/// What to do with a likelihood/impact value outside `1..=axis_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Leave the risk out of every cell and report it in `excluded`
    #[default]
    Exclude,
    /// Fail the whole aggregation with a validation error
    Reject,
    /// Pull the value into the nearest valid rating
    Clamp,
}

/// Risk engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Heatmap side length and maximum rating
    pub axis_size: u8,
    /// Handling of out-of-range ratings
    pub out_of_range: OutOfRangePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            axis_size: 5,
            out_of_range: OutOfRangePolicy::Exclude,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> GrcResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(
            axis_size = config.axis_size,
            policy = ?config.out_of_range,
            "Loaded engine config"
        );
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> GrcResult<()> {
        if self.axis_size == 0 {
            return Err(GrcError::Config("axis_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Rating scale implied by `axis_size`
    pub fn scale(&self) -> GrcResult<RatingScale> {
        RatingScale::new(self.axis_size).map_err(|e| GrcError::Config(e.to_string()))
    }
}
