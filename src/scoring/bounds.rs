//! Numeric clamping shared by every scorer.
//!
//! Non-finite values collapse to the lower bound so a NaN never leaks into a
//! response body.

pub fn clamp_unit(value: f64) -> f64 {
    clamp_to(value, 0.0, 1.0)
}

pub fn clamp_percent(value: f64) -> f64 {
    clamp_to(value, 0.0, 100.0)
}

pub fn clamp_to(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Ratio with a zero (or negative) denominator mapped to 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population variance; 0 for fewer than two values.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}
