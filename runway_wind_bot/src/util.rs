use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, Same};

/// Upstream APIs send numbers as numbers, as strings, or as `""` when
/// unknown. Anything that is not a number ends up as `None`.
pub(crate) type LenientNumber = DefaultOnError<Option<PickFirst<(Same, DisplayFromStr)>>>;

pub(crate) const METERS_PER_FOOT: f64 = 0.3048;

pub(crate) fn feet_to_meters(feet: f64) -> f64 {
    (feet * METERS_PER_FOOT).round()
}
