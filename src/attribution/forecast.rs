//! Short-horizon projection of a daily visibility series.
//!
//! An ARIMA(1,1,1)-style model: the series is differenced once, the next
//! difference is predicted from the previous difference (AR) and the previous
//! residual (MA), and the projected differences are integrated back onto the
//! last observed value.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::scoring::bounds::{clamp_percent, mean, population_variance};
use crate::scoring::validation::{Checks, Validate};

pub const MODEL_NAME: &str = "ARIMA(1,1,1)";
pub const MIN_POINTS: usize = 7;
pub const MAX_HORIZON: u32 = 90;

const PHI: f64 = 0.6;
const THETA: f64 = 0.3;
const Z_95: f64 = 1.96;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Projects `horizon` days past `last_date`. Fewer than seven observations
/// yield no points.
pub fn forecast_series(series: &[f64], horizon: u32, last_date: NaiveDate) -> Vec<ForecastPoint> {
    if series.len() < MIN_POINTS {
        return Vec::new();
    }

    let window = &series[series.len() - MIN_POINTS..];
    let diffs: Vec<f64> = window.windows(2).map(|w| w[1] - w[0]).collect();
    let drift = mean(&diffs);
    let stddev = population_variance(&diffs).sqrt();

    let mut level = window[MIN_POINTS - 1];
    let mut prev_diff = diffs[diffs.len() - 1];
    let mut prev_residual = prev_diff - drift;
    let mut points = Vec::with_capacity(horizon as usize);

    for step in 1..=horizon {
        let diff = drift + PHI * (prev_diff - drift) + THETA * prev_residual;
        level += diff;
        let spread = Z_95 * stddev * (step as f64).sqrt();

        let Some(date) = last_date.checked_add_days(Days::new(step as u64)) else {
            break;
        };
        points.push(ForecastPoint {
            date,
            value: clamp_percent(level),
            lower_bound: clamp_percent(level - spread),
            upper_bound: clamp_percent(level + spread),
        });

        prev_residual = diff - drift;
        prev_diff = diff;
    }

    points
}

/// Dollar effect of the projected change from the latest observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastImpact {
    pub projected_delta: f64,
    pub monthly_revenue_impact: f64,
}

pub fn forecast_impact(current: f64, points: &[ForecastPoint], elasticity_per_point: f64) -> ForecastImpact {
    let projected_delta = points
        .last()
        .map(|point| point.value - clamp_percent(current))
        .unwrap_or(0.0);
    ForecastImpact {
        projected_delta,
        monthly_revenue_impact: projected_delta * elasticity_per_point,
    }
}

fn default_horizon() -> u32 {
    14
}

fn default_elasticity() -> f64 {
    1500.0
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastInput {
    pub series: Vec<f64>,
    pub last_date: NaiveDate,
    #[serde(default = "default_horizon")]
    pub horizon_days: u32,
    #[serde(default = "default_elasticity")]
    pub elasticity_per_point: f64,
}

impl Validate for ForecastInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("forecast");
        checks.require(
            self.series.len() >= MIN_POINTS,
            "series",
            "at least 7 observations are required",
        );
        for (i, value) in self.series.iter().enumerate() {
            checks.percent(&format!("series[{}]", i), *value);
        }
        checks
            .range("horizon_days", self.horizon_days as f64, 1.0, MAX_HORIZON as f64)
            .non_negative("elasticity_per_point", self.elasticity_per_point)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub model: &'static str,
    pub confidence_interval: f64,
    pub points: Vec<ForecastPoint>,
    pub impact: ForecastImpact,
}

pub fn compute_forecast(input: &ForecastInput) -> Forecast {
    let points = forecast_series(&input.series, input.horizon_days, input.last_date);
    let current = input.series.last().copied().unwrap_or(0.0);
    let impact = forecast_impact(current, &points, input.elasticity_per_point);
    Forecast {
        model: MODEL_NAME,
        confidence_interval: 0.95,
        points,
        impact,
    }
}
