use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ValidationResult};
use crate::scoring::bounds::{clamp_percent, clamp_to};
use crate::scoring::validation::{Checks, Validate};

const DAYS_PER_MONTH: f64 = 30.0;

/// Dealership economics used to turn score points into dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiftModel {
    /// Conversion change per visibility point (0.005 = 0.5%)
    pub conversion_per_point: f64,
    pub monthly_leads: f64,
    pub avg_gross_profit: f64,
    pub target_score: f64,
    /// Reported confidence for lift estimates
    pub confidence: f64,
}

impl Default for LiftModel {
    fn default() -> Self {
        Self {
            conversion_per_point: 0.005,
            monthly_leads: 150.0,
            avg_gross_profit: 2800.0,
            target_score: 85.0,
            confidence: 0.70,
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn months(&self) -> f64 {
        self.days().max(0) as f64 / DAYS_PER_MONTH
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OelInput {
    pub dealer_id: String,
    pub period: Period,
    pub score_before: f64,
    pub score_after: f64,
    #[serde(default)]
    pub monthly_leads: Option<f64>,
    #[serde(default)]
    pub avg_gross_profit: Option<f64>,
}

impl Validate for OelInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("oel");
        checks
            .require(!self.dealer_id.trim().is_empty(), "dealer_id", "must not be empty")
            .require(
                self.period.end >= self.period.start,
                "period.end",
                "must not precede period.start",
            )
            .percent("score_before", self.score_before)
            .percent("score_after", self.score_after);
        if let Some(leads) = self.monthly_leads {
            checks.non_negative("monthly_leads", leads);
        }
        if let Some(profit) = self.avg_gross_profit {
            checks.non_negative("avg_gross_profit", profit);
        }
        checks.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResult {
    pub dealer_id: String,
    pub period: Period,
    /// Dollars gained (negative when engagement fell)
    pub estimate: f64,
    pub confidence: f64,
}

/// Organic Engagement Lift: gross profit attributable to a visibility change
/// over a period.
pub fn compute_oel(input: &OelInput, model: &LiftModel) -> AttributionResult {
    let lift = clamp_percent(input.score_after) - clamp_percent(input.score_before);
    let leads = input.monthly_leads.unwrap_or(model.monthly_leads);
    let profit = input.avg_gross_profit.unwrap_or(model.avg_gross_profit);
    let estimate = clamp_to(
        lift * model.conversion_per_point * leads * profit * input.period.months(),
        f64::MIN,
        f64::MAX,
    );

    tracing::debug!(
        dealer = %input.dealer_id,
        lift,
        estimate,
        "computed organic engagement lift"
    );

    AttributionResult {
        dealer_id: input.dealer_id.clone(),
        period: input.period,
        estimate,
        confidence: model.confidence,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OciInput {
    pub current_score: f64,
    #[serde(default)]
    pub target_score: Option<f64>,
    #[serde(default)]
    pub monthly_leads: Option<f64>,
    #[serde(default)]
    pub avg_gross_profit: Option<f64>,
}

impl Validate for OciInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("oci");
        checks.percent("current_score", self.current_score);
        if let Some(target) = self.target_score {
            checks.percent("target_score", target);
        }
        if let Some(leads) = self.monthly_leads {
            checks.non_negative("monthly_leads", leads);
        }
        if let Some(profit) = self.avg_gross_profit {
            checks.non_negative("avg_gross_profit", profit);
        }
        checks.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCost {
    pub current_score: f64,
    pub target_score: f64,
    /// Monthly gross profit left on the table
    pub monthly_cost: f64,
}

/// Opportunity Cost of Inaction. Never negative: being above target costs
/// nothing.
pub fn compute_oci(input: &OciInput, model: &LiftModel) -> OpportunityCost {
    let current = clamp_percent(input.current_score);
    let target = clamp_percent(input.target_score.unwrap_or(model.target_score));
    let leads = input.monthly_leads.unwrap_or(model.monthly_leads);
    let profit = input.avg_gross_profit.unwrap_or(model.avg_gross_profit);
    let monthly_cost = clamp_to(
        (target - current) * model.conversion_per_point * profit * leads,
        0.0,
        f64::MAX,
    );

    OpportunityCost {
        current_score: current,
        target_score: target,
        monthly_cost,
    }
}

/// Checks a lift model loaded from configuration.
pub fn validate_model(model: &LiftModel) -> Result<(), Vec<ScoreError>> {
    Checks::new("revenue")
        .fraction("conversion_per_point", model.conversion_per_point)
        .non_negative("monthly_lead_volume", model.monthly_leads)
        .non_negative("avg_gross_profit", model.avg_gross_profit)
        .percent("target_score", model.target_score)
        .fraction("confidence", model.confidence)
        .finish()
}
