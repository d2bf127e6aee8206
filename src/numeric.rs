/// Smallest spread the pipeline lets through (ranges, R-bar, sigma-hat).
pub(crate) const EPSILON: f64 = 1e-4;

/// Rounds to 4 decimal places for display.
pub(crate) fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
