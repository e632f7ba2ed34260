use serde::{Deserialize, Serialize};

/// One directional end of a strip, e.g. "09" or "27L".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayEnd {
    pub identifier: String,
    /// Heading in degrees true. `None` when the source had nothing parsable.
    pub heading_deg_t: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayStrip {
    pub ends: [RunwayEnd; 2],
}

impl RunwayEnd {
    pub fn new(identifier: impl Into<String>, heading_deg_t: f64) -> Self {
        Self {
            identifier: identifier.into(),
            heading_deg_t: Some(heading_deg_t),
        }
    }

    pub fn without_heading(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            heading_deg_t: None,
        }
    }

    pub(crate) fn usable_heading(&self) -> Option<f64> {
        self.heading_deg_t.filter(|h| h.is_finite())
    }
}

impl RunwayStrip {
    pub fn new(low: RunwayEnd, high: RunwayEnd) -> Self {
        Self { ends: [low, high] }
    }

    /// Builds a strip from the low end heading, deriving the reciprocal.
    pub fn from_low_end_heading(
        low_identifier: impl Into<String>,
        high_identifier: impl Into<String>,
        low_heading_deg_t: f64,
    ) -> Self {
        Self::new(
            RunwayEnd::new(low_identifier, low_heading_deg_t),
            RunwayEnd::new(
                high_identifier,
                crate::util::normalize_degrees(low_heading_deg_t + 180.0),
            ),
        )
    }

    pub fn identifiers(&self) -> [&str; 2] {
        [
            self.ends[0].identifier.as_str(),
            self.ends[1].identifier.as_str(),
        ]
    }
}
