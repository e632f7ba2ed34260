use serde::{Deserialize, Serialize};

use crate::classification::{RunwayClassification, WindStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyBand {
    Safe,
    Caution,
    Unsafe,
}

/// Operational limits applied on top of the raw classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyThresholds {
    /// When false, a headwind end is judged on its cross component like a
    /// crosswind end would be.
    pub headwind_always_safe: bool,
    pub crosswind_caution_above_knots: f64,
    pub tailwind_unsafe_above_knots: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            headwind_always_safe: true,
            crosswind_caution_above_knots: 10.0,
            tailwind_unsafe_above_knots: 5.0,
        }
    }
}

impl SafetyThresholds {
    pub fn band(&self, classification: &RunwayClassification) -> SafetyBand {
        match classification.status {
            WindStatus::Headwind if self.headwind_always_safe => SafetyBand::Safe,
            WindStatus::Headwind | WindStatus::Crosswind => {
                if classification.cross_component_knots > self.crosswind_caution_above_knots {
                    SafetyBand::Caution
                } else {
                    SafetyBand::Safe
                }
            }
            WindStatus::Tailwind => {
                if classification.tailwind_knots() > self.tailwind_unsafe_above_knots {
                    SafetyBand::Unsafe
                } else {
                    SafetyBand::Caution
                }
            }
        }
    }
}

impl RunwayClassification {
    pub fn safety(&self, thresholds: &SafetyThresholds) -> SafetyBand {
        thresholds.band(self)
    }
}
