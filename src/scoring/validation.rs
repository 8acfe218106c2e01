use crate::error::{ScoreError, ValidationResult};

use super::composite::{AtiInput, CompositeInput, QaiStarInput};
use super::input::{
    AeoInput, EeatInput, GeoInput, HrpInput, PiqrInput, QaiInput, RelevanceInput, ScsInput,
    SeoInput, WinProbabilityInput,
};
use super::pillars::{PIQR_MAX, PIQR_MAX_WARNING_MULTIPLIER};

/// Range checks run before scoring. Returns every problem, not just the first.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

/// Accumulates field errors under a common prefix (`seo.branded_ctr`).
pub struct Checks {
    prefix: &'static str,
    errors: Vec<ScoreError>,
}

impl Checks {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            errors: Vec::new(),
        }
    }

    fn name(&self, field: &str) -> String {
        format!("{}.{}", self.prefix, field)
    }

    pub fn range(&mut self, field: &str, value: f64, min: f64, max: f64) -> &mut Self {
        let field = self.name(field);
        if !value.is_finite() {
            self.errors.push(ScoreError::NotFinite { field });
        } else if value < min || value > max {
            self.errors.push(ScoreError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
        self
    }

    pub fn fraction(&mut self, field: &str, value: f64) -> &mut Self {
        self.range(field, value, 0.0, 1.0)
    }

    pub fn percent(&mut self, field: &str, value: f64) -> &mut Self {
        self.range(field, value, 0.0, 100.0)
    }

    pub fn non_negative(&mut self, field: &str, value: f64) -> &mut Self {
        self.range(field, value, 0.0, f64::MAX)
    }

    /// Strictly above zero and at most `max`.
    pub fn positive(&mut self, field: &str, value: f64, max: f64) -> &mut Self {
        if value.is_finite() && value <= 0.0 {
            let error = ScoreError::invalid(&self.name(field), "must be greater than zero");
            self.errors.push(error);
            self
        } else {
            self.range(field, value, 0.0, max)
        }
    }

    pub fn require(&mut self, ok: bool, field: &str, reason: &str) -> &mut Self {
        if !ok {
            let error = ScoreError::invalid(&self.name(field), reason);
            self.errors.push(error);
        }
        self
    }

    pub fn finish(&mut self) -> ValidationResult {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

impl Validate for ScsInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("scs")
            .fraction("validation_health", self.validation_health)
            .fraction("source_trust", self.source_trust)
            .require(self.expected_fields > 0, "expected_fields", "must be greater than zero")
            .finish()
    }
}

impl Validate for RelevanceInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("relevance")
            .fraction("visibility", self.visibility)
            .fraction("proximity", self.proximity)
            .fraction("authority", self.authority)
            .percent("scs_pct", self.scs_pct)
            .finish()
    }
}

impl Validate for PiqrInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("piqr");
        for (i, multiplier) in self.warning_multipliers.iter().enumerate() {
            checks.positive(
                &format!("warning_multipliers[{}]", i),
                *multiplier,
                PIQR_MAX_WARNING_MULTIPLIER,
            );
        }
        checks
            .non_negative("schema_latency_minutes", self.schema_latency_minutes)
            .non_negative("latency_budget_minutes", self.latency_budget_minutes)
            .fraction("duplicate_rate", self.duplicate_rate)
            .finish()
    }
}

impl Validate for SeoInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("seo")
            .fraction("organic_traffic", self.organic_traffic)
            .fraction("keyword_rankings", self.keyword_rankings)
            .fraction("local_pack_share", self.local_pack_share)
            .fraction("branded_ctr", self.branded_ctr)
            .finish()
    }
}

impl Validate for AeoInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("aeo")
            .fraction("featured_snippets", self.featured_snippets)
            .fraction("paa_capture_rate", self.paa_capture_rate)
            .fraction("ai_overview_citations", self.ai_overview_citations)
            .fraction("voice_search_share", self.voice_search_share)
            .finish()
    }
}

impl Validate for GeoInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("geo")
            .fraction("llm_mentions", self.llm_mentions)
            .range("llm_sentiment", self.llm_sentiment, -1.0, 1.0)
            .fraction("authority_links", self.authority_links)
            .finish()
    }
}

impl Validate for HrpInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("hrp")
            .require(
                self.verifiable_mentions <= self.total_mentions,
                "verifiable_mentions",
                "cannot exceed total_mentions",
            )
            .fraction("severity", self.severity)
            .finish()
    }
}

impl Validate for EeatInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("eeat")
            .fraction("bounce_rate", self.bounce_rate)
            .non_negative("time_on_site_secs", self.time_on_site_secs)
            .non_negative("pages_per_session", self.pages_per_session)
            .non_negative("content_depth_words", self.content_depth_words)
            .fraction("authorship_completeness", self.authorship_completeness)
            .fraction("technical_accuracy", self.technical_accuracy)
            .fraction("domain_authority", self.domain_authority)
            .fraction("backlink_quality", self.backlink_quality)
            .range("review_rating", self.review_rating, 0.0, 5.0)
            .fraction("review_response_rate", self.review_response_rate)
            .finish()
    }
}

impl Validate for QaiInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("qai");
        checks.require(!self.components.is_empty(), "components", "at least one component is required");
        for (i, component) in self.components.iter().enumerate() {
            checks
                .non_negative(&format!("components[{}].weight", i), component.weight)
                .percent(&format!("components[{}].score", i), component.score);
        }
        checks.finish()
    }
}

impl Validate for WinProbabilityInput {
    fn validate(&self) -> ValidationResult {
        Checks::new("win_probability")
            .percent("ai_visibility", self.ai_visibility)
            .percent("review_trust", self.review_trust)
            .percent("schema_coverage", self.schema_coverage)
            .percent("gbp_health", self.gbp_health)
            .percent("zero_click", self.zero_click)
            .finish()
    }
}

impl AtiInput {
    fn check(&self, checks: &mut Checks, prefix: &str) {
        checks
            .percent(&format!("{}schema_consistency", prefix), self.schema_consistency)
            .percent(&format!("{}review_legitimacy", prefix), self.review_legitimacy)
            .percent(&format!("{}topical_authority", prefix), self.topical_authority)
            .percent(&format!("{}source_credibility", prefix), self.source_credibility);
    }
}

impl Validate for AtiInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("ati");
        self.check(&mut checks, "");
        checks.finish()
    }
}

impl Validate for QaiStarInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("qai_star");
        checks
            .percent("seo", self.seo)
            .percent("aiv", self.aiv)
            .fraction("hrp", self.hrp)
            .percent("visibility", self.visibility);
        if let Some(previous) = self.previous_visibility {
            checks.percent("previous_visibility", previous);
        }
        checks.finish()
    }
}

impl Validate for CompositeInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("composite");
        checks.require(
            !self.engine_scores.is_empty(),
            "engine_scores",
            "at least one engine score is required",
        );
        for (engine, score) in &self.engine_scores {
            checks.percent(&format!("engine_scores.{}", engine), *score);
        }
        checks.range("piqr", self.piqr, 1.0, PIQR_MAX);
        for (i, v) in self.aiv_history.iter().enumerate() {
            checks.percent(&format!("aiv_history[{}]", i), *v);
        }
        for (i, v) in self.ati_history.iter().enumerate() {
            checks.percent(&format!("ati_history[{}]", i), *v);
        }
        checks.percent("qai", self.qai).percent("eeat", self.eeat);
        self.ati.check(&mut checks, "ati.");
        checks.finish()
    }
}
