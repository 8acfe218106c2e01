//! Per-pillar input records. Built fresh per request, never stored.
//!
//! Fractions are 0-1, percentages 0-100. JSON field names are camelCase.

use serde::{Deserialize, Serialize};

/// Structured-data (schema.org) coverage counts and health.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScsInput {
    pub parsed_fields: u32,
    pub expected_fields: u32,
    pub validation_health: f64,
    pub source_trust: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceInput {
    pub visibility: f64,
    pub proximity: f64,
    pub authority: f64,
    /// SCS percentage, 0-100
    pub scs_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PiqrInput {
    #[serde(default)]
    pub compliance_fails: u32,
    #[serde(default)]
    pub warning_multipliers: Vec<f64>,
    /// Observed minutes for schema to propagate
    #[serde(default)]
    pub schema_latency_minutes: f64,
    /// Budgeted minutes; 0 disables the latency penalty
    #[serde(default)]
    pub latency_budget_minutes: f64,
    /// Share of pages with duplicate content, 0-1
    #[serde(default)]
    pub duplicate_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoInput {
    pub organic_traffic: f64,
    pub keyword_rankings: f64,
    pub local_pack_share: f64,
    pub branded_ctr: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AeoInput {
    pub featured_snippets: f64,
    pub paa_capture_rate: f64,
    pub ai_overview_citations: f64,
    pub voice_search_share: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoInput {
    pub llm_mentions: f64,
    /// -1 (hostile) to +1 (glowing)
    pub llm_sentiment: f64,
    pub authority_links: f64,
}

/// Hallucination and brand risk: how many AI mentions could be verified.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrpInput {
    pub total_mentions: u32,
    pub verifiable_mentions: u32,
    #[serde(default)]
    pub severity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EeatInput {
    pub bounce_rate: f64,
    pub time_on_site_secs: f64,
    pub pages_per_session: f64,
    pub content_depth_words: f64,
    pub authorship_completeness: f64,
    pub technical_accuracy: f64,
    pub domain_authority: f64,
    pub backlink_quality: f64,
    pub brand_mentions: u32,
    #[serde(default)]
    pub ssl_cert: bool,
    #[serde(default)]
    pub privacy_policy: bool,
    #[serde(default)]
    pub contact_info_complete: bool,
    /// Star rating, 0-5
    pub review_rating: f64,
    pub review_response_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaiComponent {
    pub id: String,
    pub weight: f64,
    /// 0-100
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaiInput {
    pub components: Vec<QaiComponent>,
}

/// All five signals are percentages (0-100).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbabilityInput {
    pub ai_visibility: f64,
    pub review_trust: f64,
    pub schema_coverage: f64,
    pub gbp_health: f64,
    pub zero_click: f64,
}
