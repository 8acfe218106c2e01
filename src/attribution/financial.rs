use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::scoring::bounds::safe_ratio;
use crate::scoring::composite::compute_dtri;
use crate::scoring::validation::{Checks, Validate};

/// Leverage applied to predicted lift when ranking actions.
pub const AROI_LEVERAGE: f64 = 1.25;

const TRUST_FLOOR: f64 = 0.85;
const LEAD_RESPONSE_LIMIT_HOURS: f64 = 4.0;
const COMPETITIVE_DELTA_LIMIT: f64 = 0.10;
const DECAY_COST_LIMIT: f64 = 50_000.0;

/// Trust Sensitivity Multiplier: how strongly market conditions amplify a
/// trust change.
pub fn trust_sensitivity(interest_rate: f64, consumer_confidence_drop: f64) -> f64 {
    1.0 + interest_rate * 0.3 + consumer_confidence_drop * 0.5
}

/// Ad spend needed to replace organic leads lost to a QAI decline.
pub fn decay_tax_cost(
    qai_decline: f64,
    beta_decay_leads: f64,
    organic_closing_rate: f64,
    blended_cac: f64,
    tsm: f64,
) -> f64 {
    safe_ratio(qai_decline * beta_decay_leads, organic_closing_rate) * blended_cac * tsm
}

pub fn actionable_roi(predicted_profit_lift: f64, tsm: f64, cost_of_effort: f64) -> f64 {
    safe_ratio(predicted_profit_lift * tsm * AROI_LEVERAGE, cost_of_effort)
}

pub fn strategic_window_value(
    lead_gain: f64,
    months: f64,
    organic_closing_rate: f64,
    gross_profit_per_unit: f64,
    tsm: f64,
) -> f64 {
    lead_gain * months * organic_closing_rate * gross_profit_per_unit * tsm
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    ReviewCrisis,
    CompetitiveAttack,
    EmergencyBudgetReallocation,
}

impl Trigger {
    pub fn action(&self) -> &'static str {
        match self {
            Trigger::ReviewCrisis => "Run the review crisis playbook",
            Trigger::CompetitiveAttack => "Counter the competitor's visibility gains",
            Trigger::EmergencyBudgetReallocation => "Reallocate budget away from decaying channels",
        }
    }
}

/// Conditions that warrant action without waiting for a review cycle.
pub fn check_triggers(
    eeat_trust: f64,
    lead_response_hours: f64,
    competitive_delta: f64,
    decay_cost: f64,
) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if eeat_trust < TRUST_FLOOR && lead_response_hours > LEAD_RESPONSE_LIMIT_HOURS {
        triggers.push(Trigger::ReviewCrisis);
    }
    if competitive_delta > COMPETITIVE_DELTA_LIMIT {
        triggers.push(Trigger::CompetitiveAttack);
    }
    if decay_cost > DECAY_COST_LIMIT {
        triggers.push(Trigger::EmergencyBudgetReallocation);
    }
    triggers
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DtriFinancialInput {
    pub qai: f64,
    pub eeat: f64,
    /// Trustworthiness dimension, 0-1
    pub eeat_trust: f64,
    pub interest_rate: f64,
    pub consumer_confidence_drop: f64,
    pub qai_decline: f64,
    pub beta_decay_leads: f64,
    pub organic_closing_rate: f64,
    pub blended_cac: f64,
    pub gross_profit_per_unit: f64,
    pub predicted_profit_lift: f64,
    pub cost_of_effort: f64,
    pub lead_gain: f64,
    pub window_months: f64,
    pub lead_response_hours: f64,
    pub competitive_delta: f64,
}

impl Validate for DtriFinancialInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("dtri")
            .percent("qai", self.qai)
            .percent("eeat", self.eeat)
            .fraction("eeat_trust", self.eeat_trust)
            .fraction("interest_rate", self.interest_rate)
            .fraction("consumer_confidence_drop", self.consumer_confidence_drop)
            .non_negative("qai_decline", self.qai_decline)
            .non_negative("beta_decay_leads", self.beta_decay_leads)
            .fraction("organic_closing_rate", self.organic_closing_rate)
            .non_negative("blended_cac", self.blended_cac)
            .non_negative("gross_profit_per_unit", self.gross_profit_per_unit)
            .non_negative("predicted_profit_lift", self.predicted_profit_lift)
            .non_negative("cost_of_effort", self.cost_of_effort)
            .non_negative("lead_gain", self.lead_gain)
            .non_negative("window_months", self.window_months)
            .non_negative("lead_response_hours", self.lead_response_hours)
            .range("competitive_delta", self.competitive_delta, -1.0, 1.0)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DtriFinancials {
    pub dtri: f64,
    pub trust_sensitivity: f64,
    pub decay_tax_cost: f64,
    pub actionable_roi: f64,
    pub strategic_window_value: f64,
    pub triggers: Vec<Trigger>,
}

pub fn compute_dtri_financials(input: &DtriFinancialInput) -> DtriFinancials {
    let tsm = trust_sensitivity(input.interest_rate, input.consumer_confidence_drop);
    let decay = decay_tax_cost(
        input.qai_decline,
        input.beta_decay_leads,
        input.organic_closing_rate,
        input.blended_cac,
        tsm,
    );
    let triggers = check_triggers(
        input.eeat_trust,
        input.lead_response_hours,
        input.competitive_delta,
        decay,
    );
    if !triggers.is_empty() {
        tracing::info!(?triggers, decay_tax_cost = decay, "dtri triggers fired");
    }

    DtriFinancials {
        dtri: compute_dtri(input.qai, input.eeat).value,
        trust_sensitivity: tsm,
        decay_tax_cost: decay,
        actionable_roi: actionable_roi(input.predicted_profit_lift, tsm, input.cost_of_effort),
        strategic_window_value: strategic_window_value(
            input.lead_gain,
            input.window_months,
            input.organic_closing_rate,
            input.gross_profit_per_unit,
            tsm,
        ),
        triggers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> DtriFinancialInput {
        DtriFinancialInput {
            qai: 80.0,
            eeat: 60.0,
            eeat_trust: 0.9,
            interest_rate: 0.1,
            consumer_confidence_drop: 0.2,
            qai_decline: 5.0,
            beta_decay_leads: 2.0,
            organic_closing_rate: 0.2,
            blended_cac: 400.0,
            gross_profit_per_unit: 3000.0,
            predicted_profit_lift: 10_000.0,
            cost_of_effort: 5_000.0,
            lead_gain: 10.0,
            window_months: 6.0,
            lead_response_hours: 2.0,
            competitive_delta: 0.05,
        }
    }

    #[test]
    fn test_trust_sensitivity() {
        assert!((trust_sensitivity(0.1, 0.2) - 1.13).abs() < 1e-9);
        assert_eq!(trust_sensitivity(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_decay_tax_zero_closing_rate() {
        assert_eq!(decay_tax_cost(5.0, 2.0, 0.0, 400.0, 1.0), 0.0);
    }

    #[test]
    fn test_financials() {
        let result = compute_dtri_financials(&input());
        assert_eq!(result.dtri, 70.0);
        // (5 * 2 / 0.2) * 400 * 1.13
        assert!((result.decay_tax_cost - 22_600.0).abs() < 1e-6);
        // 10000 * 1.13 * 1.25 / 5000
        assert!((result.actionable_roi - 2.825).abs() < 1e-9);
        // 10 * 6 * 0.2 * 3000 * 1.13
        assert!((result.strategic_window_value - 40_680.0).abs() < 1e-6);
        assert!(result.triggers.is_empty());
    }

    #[test]
    fn test_all_triggers() {
        let triggers = check_triggers(0.8, 5.0, 0.2, 60_000.0);
        assert_eq!(
            triggers,
            vec![
                Trigger::ReviewCrisis,
                Trigger::CompetitiveAttack,
                Trigger::EmergencyBudgetReallocation
            ]
        );
    }

    #[test]
    fn test_review_crisis_needs_both_conditions() {
        assert!(check_triggers(0.8, 3.0, 0.0, 0.0).is_empty());
        assert!(check_triggers(0.9, 6.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_validation() {
        let mut bad = input();
        bad.organic_closing_rate = 1.5;
        bad.eeat_trust = -0.1;
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field(), "dtri.eeat_trust");
    }
}
