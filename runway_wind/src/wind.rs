use serde::{Deserialize, Serialize};

use crate::{
    error::{MeasurementField, ResolverError, ResolverResult},
    util::normalize_degrees,
};

/// Highest speed a METAR wind group can carry (`999MPS`), rounded up.
pub const MAX_SPEED_KNOTS: f64 = 2000.0;

/// A single wind reading: where the wind blows *from* (degrees true) and
/// how strong it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindObservation {
    direction_deg: f64,
    speed_knots: f64,
}

impl WindObservation {
    pub fn new(direction_deg: f64, speed_knots: f64) -> ResolverResult<Self> {
        let wind = Self {
            direction_deg,
            speed_knots,
        };
        wind.validate()?;
        Ok(Self {
            direction_deg: normalize_degrees(direction_deg),
            ..wind
        })
    }

    pub fn calm() -> Self {
        Self {
            direction_deg: 0.0,
            speed_knots: 0.0,
        }
    }

    pub fn direction_deg(&self) -> f64 {
        self.direction_deg
    }

    pub fn speed_knots(&self) -> f64 {
        self.speed_knots
    }

    /// Values can reach us through `Deserialize` without passing `new`, so
    /// the resolver checks again before doing any math.
    pub(crate) fn validate(&self) -> ResolverResult<()> {
        if !self.direction_deg.is_finite() {
            return Err(ResolverError::InvalidMeasurement {
                field: MeasurementField::Direction,
                value: self.direction_deg,
            });
        }
        if !(0.0..=MAX_SPEED_KNOTS).contains(&self.speed_knots) {
            return Err(ResolverError::InvalidMeasurement {
                field: MeasurementField::Speed,
                value: self.speed_knots,
            });
        }
        Ok(())
    }
}
