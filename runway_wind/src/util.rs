/// Brings any finite bearing into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized + 0.0 }
}

/// Rounds to two decimals. Halves go away from zero, so `x` and `-x`
/// round to opposite values. Negative zero is folded into positive zero
/// so that equal inputs always produce bit-identical outputs.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
