//! Rolling-window statistics shared by the indicator modules
//!
//! Every helper operates on the trailing end of the input so indicator code
//! can pass the whole close/volume series and a nominal window size. Windows
//! shrink to the available length instead of producing undefined values.

/// Exponential moving average series with the no-bias-adjustment recurrence:
/// `ema[0] = x[0]`, `ema[t] = alpha * x[t] + (1 - alpha) * ema[t-1]`,
/// `alpha = 2 / (span + 1)`.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);
    for &x in &values[1..] {
        ema = alpha * x + (1.0 - alpha) * ema;
        out.push(ema);
    }
    out
}

/// Final value of the exponential moving average over the whole series.
pub fn ema(values: &[f64], span: usize) -> Option<f64> {
    ema_series(values, span).last().copied()
}

/// Simple moving average over the trailing `period` values (or fewer when the
/// series is shorter).
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() || period == 0 {
        return None;
    }
    let window = &values[values.len().saturating_sub(period)..];
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Sample standard deviation (n-1 denominator) over the trailing `period`
/// values. Needs at least two values in the window.
pub fn sample_std(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let window = &values[values.len().saturating_sub(period)..];
    if window.len() < 2 {
        return None;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
        / (window.len() - 1) as f64;
    Some(variance.sqrt())
}

/// True range of a bar given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Replace NaN/infinite intermediates with a documented fallback.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
