use serde::{Deserialize, Serialize};

use crate::{util::round_to_hundredths, wind::WindObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindStatus {
    Headwind,
    Tailwind,
    Crosswind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadTailSense {
    Headwind,
    Tailwind,
}

/// Side of the nose the wind comes from, seen from a pilot lined up on
/// the runway end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrosswindSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunwayClassification {
    pub status: WindStatus,
    /// Along the runway axis. Positive is tailwind, negative is headwind.
    pub head_tail_component_knots: f64,
    /// Magnitude across the runway axis.
    pub cross_component_knots: f64,
    pub cross_side: Option<CrosswindSide>,
    pub head_tail_sense: HeadTailSense,
}

impl RunwayClassification {
    /// Splits `wind` into components for a runway end pointing at
    /// `heading_deg_t`.
    ///
    /// With `delta = direction - heading`:
    /// * along axis: `-speed * cos(delta)`, so wind straight on the nose
    ///   comes out negative (headwind).
    /// * across: `speed * sin(delta)`; positive means the wind comes from
    ///   the right of the nose, negative from the left. This holds for
    ///   every end alike, the reciprocal end is never special cased.
    ///
    /// Both components are rounded to hundredths before classifying. The
    /// status is crosswind only when the cross component is strictly
    /// larger than the along-axis one; ties stay head/tail.
    pub fn from_wind(wind: &WindObservation, heading_deg_t: f64) -> Self {
        let delta = (wind.direction_deg() - heading_deg_t).to_radians();
        let speed = wind.speed_knots();

        let head_tail = round_to_hundredths(-speed * delta.cos());
        let cross_signed = round_to_hundredths(speed * delta.sin());
        let cross = cross_signed.abs();

        let cross_side = if cross_signed > 0.0 {
            Some(CrosswindSide::Right)
        } else if cross_signed < 0.0 {
            Some(CrosswindSide::Left)
        } else {
            None
        };

        let head_tail_sense = if head_tail > 0.0 {
            HeadTailSense::Tailwind
        } else {
            HeadTailSense::Headwind
        };

        let status = if cross > head_tail.abs() {
            WindStatus::Crosswind
        } else {
            match head_tail_sense {
                HeadTailSense::Tailwind => WindStatus::Tailwind,
                HeadTailSense::Headwind => WindStatus::Headwind,
            }
        };

        Self {
            status,
            head_tail_component_knots: head_tail,
            cross_component_knots: cross,
            cross_side,
            head_tail_sense,
        }
    }

    pub fn headwind_knots(&self) -> f64 {
        (-self.head_tail_component_knots).max(0.0)
    }

    pub fn tailwind_knots(&self) -> f64 {
        self.head_tail_component_knots.max(0.0)
    }

    /// Magnitude along the runway axis, whichever way it blows.
    pub fn head_tail_knots(&self) -> f64 {
        self.head_tail_component_knots.abs()
    }
}
