use indexmap::{IndexMap, map::Entry};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{
    classification::RunwayClassification,
    error::ResolverResult,
    runway::RunwayStrip,
    wind::WindObservation,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub wind: WindObservation,
    pub classifications: IndexMap<String, RunwayClassification>,
    pub skipped: Vec<SkippedRunwayEnd>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRunwayEnd {
    pub identifier: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingHeading,
    DuplicateIdentifier,
}

/// Classifies every runway end of an airport against one wind reading.
///
/// Returns `Ok(None)` when there is nothing to compute (no wind, or no
/// runway list). A wind reading that is not finite or has negative speed
/// fails the whole call, since every classification would be derived
/// from it. Ends without a usable heading are skipped and listed in
/// [`Resolution::skipped`]; the rest of the batch is still classified.
pub fn resolve(
    wind: Option<&WindObservation>,
    strips: Option<&[RunwayStrip]>,
) -> ResolverResult<Option<Resolution>> {
    let (Some(wind), Some(strips)) = (wind, strips) else {
        trace!("Missing wind or runway data, nothing to resolve");
        return Ok(None);
    };
    wind.validate()?;

    let mut classifications = IndexMap::new();
    let mut skipped = Vec::new();

    for end in strips.iter().flat_map(|strip| strip.ends.iter()) {
        let Some(heading) = end.usable_heading() else {
            warn!(
                runway = %end.identifier,
                heading = ?end.heading_deg_t,
                "Skipping runway end without a usable heading"
            );
            skipped.push(SkippedRunwayEnd {
                identifier: end.identifier.clone(),
                reason: SkipReason::MissingHeading,
            });
            continue;
        };

        match classifications.entry(end.identifier.clone()) {
            Entry::Occupied(_) => {
                warn!(runway = %end.identifier, "Duplicate runway identifier, keeping the first");
                skipped.push(SkippedRunwayEnd {
                    identifier: end.identifier.clone(),
                    reason: SkipReason::DuplicateIdentifier,
                });
            }
            Entry::Vacant(vacant) => {
                let classification = RunwayClassification::from_wind(wind, heading);
                trace!(
                    runway = %end.identifier,
                    heading,
                    ?classification,
                    "Classified runway end"
                );
                vacant.insert(classification);
            }
        }
    }

    Ok(Some(Resolution {
        wind: *wind,
        classifications,
        skipped,
    }))
}
