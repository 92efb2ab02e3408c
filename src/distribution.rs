/// Rounds `value` to `decimals` places.
///
/// The exact binary value is rounded, ties to even, so `0.35` (stored just
/// below the midpoint) becomes `0.3`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.*}", decimals as usize)
        .parse()
        .unwrap_or(value)
}

/// Splits `total` into `n` rounded parts whose rounded sum is exactly
/// `round_to(total, decimals)`.
///
/// The first `n - 1` parts are the rounded even share; the last one absorbs
/// the residual, so `distribute_even(100.0, 3, 1)` is `[33.3, 33.3, 33.4]`.
pub fn distribute_even(total: f64, n: usize, decimals: u32) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let base = round_to(total / n as f64, decimals);
    let mut parts = vec![base; n];

    let partial: f64 = parts[..n - 1].iter().sum();
    let partial = if n > 1 { round_to(partial, decimals) } else { 0.0 };
    parts[n - 1] = round_to(total - partial, decimals);
    parts
}
