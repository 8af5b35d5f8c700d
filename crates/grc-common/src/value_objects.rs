//! Value Objects - Immutable, self-validating primitives
//!
//! Value Objects are:
//! - Immutable
//! - Comparable by value (not identity)
//! - Self-validating

use crate::error::{GrcError, GrcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed rating range `1..=max` shared by likelihood and impact
///
/// # Invariants
/// - `max >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RatingScale {
    max: u8,
}

impl RatingScale {
    /// The 1-5 scale used by every heatmap screen
    pub const FIVE_POINT: Self = Self { max: 5 };

    /// Create scale with validation
    pub fn new(max: u8) -> GrcResult<Self> {
        if max == 0 {
            return Err(GrcError::validation("rating scale must have at least one point"));
        }
        Ok(Self { max })
    }

    /// Highest rating on the scale
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Whether `value` is a valid rating
    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        (1..=self.max).contains(&value)
    }

    /// Clamp `value` into `1..=max`
    #[inline]
    pub fn clamp(&self, value: u8) -> u8 {
        value.clamp(1, self.max)
    }

    /// Validate a named rating, e.g. `("likelihood", 7)`
    pub fn check(&self, field: &str, value: u8) -> GrcResult<u8> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(GrcError::Validation(format!(
                "{} must be between 1 and {}, got {}",
                field, self.max, value
            )))
        }
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::FIVE_POINT
    }
}

impl TryFrom<u8> for RatingScale {
    type Error = GrcError;

    fn try_from(max: u8) -> GrcResult<Self> {
        Self::new(max)
    }
}

impl From<RatingScale> for u8 {
    fn from(scale: RatingScale) -> u8 {
        scale.max
    }
}

/// Identifier of the person or system performing an action
///
/// # Invariants
/// - Must be non-blank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Create actor ID with validation
    pub fn new(id: impl Into<String>) -> GrcResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GrcError::validation("actor cannot be empty"));
        }
        Ok(Self(id))
    }

    /// Get inner value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
