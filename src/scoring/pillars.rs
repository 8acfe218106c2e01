use super::bounds::{clamp_percent, clamp_to, clamp_unit, safe_ratio};
use super::breakdown::{Factor, Pillar, PillarScore};
use super::input::{
    AeoInput, EeatInput, GeoInput, HrpInput, PiqrInput, QaiInput, RelevanceInput, ScsInput,
    SeoInput, WinProbabilityInput,
};

/// Each schema error costs 2% of the SCS, up to 30%.
const SCS_ERROR_PENALTY: f64 = 0.02;
const SCS_MAX_ERROR_PENALTY: f64 = 0.3;

const PIQR_COMPLIANCE_WEIGHT: f64 = 0.25;
const PIQR_MAX_LATENCY_PENALTY: f64 = 2.0;
const PIQR_MAX_DUPLICATE_PENALTY: f64 = 1.5;

/// Largest single warning multiplier accepted by validation.
pub const PIQR_MAX_WARNING_MULTIPLIER: f64 = 10.0;
/// Ceiling for the final PIQR; anything above already zeroes visibility.
pub const PIQR_MAX: f64 = 100.0;

pub const WIN_PROBABILITY_WEIGHTS: [(&str, f64); 5] = [
    ("AI visibility", 0.30),
    ("Review trust", 0.25),
    ("Schema coverage", 0.20),
    ("GBP health", 0.15),
    ("Zero-click", 0.10),
];

/// Sum `weight * value` over the factors.
fn weighted_sum(factors: &[Factor]) -> f64 {
    factors.iter().map(|f| f.weight * f.value).sum()
}

/// Structured-data Coverage Score, 0-100.
pub fn compute_scs(input: &ScsInput, errors_detected: u32) -> PillarScore {
    let coverage = safe_ratio(input.parsed_fields as f64, input.expected_fields as f64);
    let health = clamp_unit(input.validation_health);
    let trust = clamp_unit(input.source_trust);
    let base = coverage * health * trust;

    let error_cut = (errors_detected as f64 * SCS_ERROR_PENALTY).min(SCS_MAX_ERROR_PENALTY);
    let penalty = 1.0 - error_cut;
    let scs_pct = clamp_percent(base * penalty * 100.0);

    let factors = vec![
        Factor::new("Field coverage", 1.0, coverage).with_note(format!(
            "{} of {} fields parsed",
            input.parsed_fields, input.expected_fields
        )),
        Factor::new("Validation health", 1.0, health),
        Factor::new("Source trust", 1.0, trust),
        Factor::new("Error penalty", 1.0, penalty)
            .with_note(format!("{} errors detected", errors_detected)),
    ];

    PillarScore::new(Pillar::Scs, scs_pct, factors)
}

/// Relevance Index, 0-1: visibility * proximity * authority * SCS weight.
pub fn compute_relevance(input: &RelevanceInput) -> PillarScore {
    let visibility = clamp_unit(input.visibility);
    let proximity = clamp_unit(input.proximity);
    let authority = clamp_unit(input.authority);
    let scs_weight = clamp_unit(input.scs_pct / 100.0);

    let ri = clamp_unit(visibility * proximity * authority * scs_weight);
    let factors = vec![
        Factor::new("Visibility", 1.0, visibility),
        Factor::new("Proximity", 1.0, proximity),
        Factor::new("Authority", 1.0, authority),
        Factor::new("SCS weight", 1.0, scs_weight),
    ];

    PillarScore::new(Pillar::Relevance, ri, factors)
}

/// Penalty-adjusted quality ratio. 1.0 means no penalty; larger values
/// divide downstream visibility scores.
pub fn compute_piqr(input: &PiqrInput) -> PillarScore {
    let compliance = 1.0 + input.compliance_fails as f64 * PIQR_COMPLIANCE_WEIGHT;
    let warnings = clamp_to(
        input
            .warning_multipliers
            .iter()
            .filter(|m| m.is_finite() && **m > 0.0)
            .product(),
        0.0,
        PIQR_MAX,
    );
    let base = compliance * warnings;

    let latency = if input.latency_budget_minutes > 0.0 {
        clamp_to(
            input.schema_latency_minutes / input.latency_budget_minutes,
            1.0,
            PIQR_MAX_LATENCY_PENALTY,
        )
    } else {
        1.0
    };
    let duplicate = clamp_to(
        1.0 + clamp_unit(input.duplicate_rate),
        1.0,
        PIQR_MAX_DUPLICATE_PENALTY,
    );

    let piqr = clamp_to(base * latency * duplicate, 1.0, PIQR_MAX);

    let factors = vec![
        Factor::new("Compliance fails", PIQR_COMPLIANCE_WEIGHT, compliance)
            .with_note(format!("{} fails", input.compliance_fails)),
        Factor::new("Warning multipliers", 1.0, warnings)
            .with_note(format!("{} signals", input.warning_multipliers.len())),
        Factor::new("Schema latency", 1.0, latency),
        Factor::new("Duplicate content", 1.0, duplicate),
    ];

    PillarScore::new(Pillar::Piqr, piqr, factors)
}

/// Traditional search, 0-100.
pub fn compute_seo(input: &SeoInput) -> PillarScore {
    let factors = vec![
        Factor::new("Organic traffic", 0.25, clamp_unit(input.organic_traffic)),
        Factor::new("Keyword rankings", 0.30, clamp_unit(input.keyword_rankings)),
        Factor::new("Local pack share", 0.35, clamp_unit(input.local_pack_share)),
        Factor::new("Branded CTR", 0.10, clamp_unit(input.branded_ctr)),
    ];
    let value = clamp_percent(weighted_sum(&factors) * 100.0);
    PillarScore::new(Pillar::Seo, value, factors)
}

/// Answer-engine / zero-click presence, 0-100. The raw weights sum to 1.25
/// and are normalized back down.
pub fn compute_aeo(input: &AeoInput) -> PillarScore {
    let factors = vec![
        Factor::new("Featured snippets", 0.25, clamp_unit(input.featured_snippets)),
        Factor::new("PAA capture", 0.45, clamp_unit(input.paa_capture_rate)),
        Factor::new(
            "AI overview citations",
            0.40,
            clamp_unit(input.ai_overview_citations),
        ),
        Factor::new("Voice search", 0.15, clamp_unit(input.voice_search_share)),
    ];
    let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
    let value = clamp_percent(weighted_sum(&factors) / total_weight * 100.0);
    PillarScore::new(Pillar::Aeo, value, factors)
}

/// Generative-engine presence, 0-100.
pub fn compute_geo(input: &GeoInput) -> PillarScore {
    let sentiment = clamp_unit((clamp_to(input.llm_sentiment, -1.0, 1.0) + 1.0) / 2.0);
    let factors = vec![
        Factor::new("LLM mentions", 0.50, clamp_unit(input.llm_mentions)),
        Factor::new("LLM sentiment", 0.30, sentiment)
            .with_note(format!("raw {:+.2}", input.llm_sentiment)),
        Factor::new("Authority links", 0.20, clamp_unit(input.authority_links)),
    ];
    let value = clamp_percent(weighted_sum(&factors) * 100.0);
    PillarScore::new(Pillar::Geo, value, factors)
}

/// Hallucination risk penalty, 0-1.
pub fn compute_hrp(input: &HrpInput) -> PillarScore {
    if input.total_mentions == 0 {
        return PillarScore::new(
            Pillar::Hrp,
            0.0,
            vec![Factor::new("Hallucination rate", 1.0, 0.0).with_note("no mentions")],
        );
    }
    let total = input.total_mentions as f64;
    let verifiable = input.verifiable_mentions.min(input.total_mentions) as f64;
    let rate = (total - verifiable) / total;
    let severity = clamp_unit(input.severity);
    let hrp = clamp_unit(rate * (1.0 + severity));

    let factors = vec![
        Factor::new("Hallucination rate", 1.0, rate).with_note(format!(
            "{} of {} mentions verifiable",
            input.verifiable_mentions, input.total_mentions
        )),
        Factor::new("Severity", 1.0, severity),
    ];
    PillarScore::new(Pillar::Hrp, hrp, factors)
}

/// Experience, expertise, authoritativeness and trustworthiness, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EeatDimensions {
    pub experience: f64,
    pub expertise: f64,
    pub authoritativeness: f64,
    pub trustworthiness: f64,
}

pub fn eeat_dimensions(input: &EeatInput) -> EeatDimensions {
    let experience = (1.0 - clamp_unit(input.bounce_rate)) * 0.30
        + clamp_unit(safe_ratio(input.time_on_site_secs, 300.0)) * 0.40
        + clamp_unit(safe_ratio(input.pages_per_session, 5.0)) * 0.30;

    let expertise = clamp_unit(safe_ratio(input.content_depth_words, 2000.0)) * 0.40
        + clamp_unit(input.authorship_completeness) * 0.30
        + clamp_unit(input.technical_accuracy) * 0.30;

    let authoritativeness = clamp_unit(input.domain_authority) * 0.40
        + clamp_unit(input.backlink_quality) * 0.35
        + clamp_unit(input.brand_mentions as f64 / 100.0) * 0.25;

    let flag = |set: bool, weight: f64| if set { weight } else { 0.0 };
    let trustworthiness = flag(input.ssl_cert, 0.15)
        + flag(input.privacy_policy, 0.10)
        + flag(input.contact_info_complete, 0.15)
        + clamp_unit(input.review_rating / 5.0) * 0.40
        + clamp_unit(input.review_response_rate) * 0.20;

    EeatDimensions {
        experience: clamp_percent(experience * 100.0),
        expertise: clamp_percent(expertise * 100.0),
        authoritativeness: clamp_percent(authoritativeness * 100.0),
        trustworthiness: clamp_percent(trustworthiness * 100.0),
    }
}

/// E-E-A-T composite, 0-100. Trust carries the most weight.
pub fn compute_eeat(input: &EeatInput) -> PillarScore {
    let dims = eeat_dimensions(input);
    let factors = vec![
        Factor::new("Trustworthiness", 0.40, dims.trustworthiness),
        Factor::new("Experience", 0.20, dims.experience),
        Factor::new("Expertise", 0.20, dims.expertise),
        Factor::new("Authoritativeness", 0.20, dims.authoritativeness),
    ];
    let value = clamp_percent(weighted_sum(&factors));
    PillarScore::new(Pillar::Eeat, value, factors)
}

/// Quality/authority index: weighted mean of component scores, 0-100.
///
/// Weights are relative. Non-finite or negative weights count as zero.
pub fn compute_qai(input: &QaiInput) -> PillarScore {
    let factors: Vec<Factor> = input
        .components
        .iter()
        .map(|c| {
            let weight = if c.weight.is_finite() { c.weight.max(0.0) } else { 0.0 };
            Factor::new(&c.id, weight, clamp_percent(c.score))
        })
        .collect();
    // Scale by the largest weight so huge relative weights cannot overflow.
    let largest = factors.iter().map(|f| f.weight).fold(0.0, f64::max);
    let shares: Vec<f64> = factors.iter().map(|f| safe_ratio(f.weight, largest)).collect();
    let weighted: f64 = shares.iter().zip(&factors).map(|(s, f)| s * f.value).sum();
    let value = clamp_percent(safe_ratio(weighted, shares.iter().sum()));
    PillarScore::new(Pillar::Qai, value, factors)
}

/// Chance of winning an AI recommendation, as a whole percent.
pub fn win_probability(input: &WinProbabilityInput) -> PillarScore {
    let values = [
        input.ai_visibility,
        input.review_trust,
        input.schema_coverage,
        input.gbp_health,
        input.zero_click,
    ];
    let factors: Vec<Factor> = WIN_PROBABILITY_WEIGHTS
        .iter()
        .zip(values)
        .map(|((label, weight), value)| Factor::new(label, *weight, clamp_percent(value)))
        .collect();
    let value = clamp_percent(weighted_sum(&factors).round());
    PillarScore::new(Pillar::WinProbability, value, factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::breakdown::Scale;
    use crate::scoring::input::QaiComponent;

    fn full_scs() -> ScsInput {
        ScsInput {
            parsed_fields: 10,
            expected_fields: 10,
            validation_health: 1.0,
            source_trust: 1.0,
        }
    }

    fn in_bounds(score: &PillarScore) -> bool {
        let value_ok = match score.scale {
            Scale::Percent => (0.0..=100.0).contains(&score.value),
            Scale::Unit => (0.0..=1.0).contains(&score.value),
            Scale::Multiplier => (1.0..=PIQR_MAX).contains(&score.value),
        };
        value_ok
            && score
                .factors
                .iter()
                .all(|f| f.weight.is_finite() && f.value.is_finite())
    }

    #[test]
    fn test_scs_full_coverage() {
        let result = compute_scs(&full_scs(), 0);
        assert_eq!(result.value, 100.0);
        assert_eq!(result.factors.len(), 4);
    }

    #[test]
    fn test_scs_error_penalty() {
        // 5 errors -> 10% off
        let result = compute_scs(&full_scs(), 5);
        assert!((result.value - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_scs_error_penalty_capped() {
        let result = compute_scs(&full_scs(), 100);
        assert!((result.value - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_scs_zero_expected_fields() {
        let mut input = full_scs();
        input.expected_fields = 0;
        assert_eq!(compute_scs(&input, 0).value, 0.0);
    }

    #[test]
    fn test_scs_overparsed_clamps() {
        let mut input = full_scs();
        input.parsed_fields = 30;
        assert_eq!(compute_scs(&input, 0).value, 100.0);
    }

    #[test]
    fn test_relevance_index() {
        let result = compute_relevance(&RelevanceInput {
            visibility: 0.8,
            proximity: 0.5,
            authority: 0.9,
            scs_pct: 100.0,
        });
        assert!((result.value - 0.36).abs() < 1e-9);
    }

    #[test]
    fn test_relevance_scs_weight_clamps() {
        let result = compute_relevance(&RelevanceInput {
            visibility: 1.0,
            proximity: 1.0,
            authority: 1.0,
            scs_pct: 250.0,
        });
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_piqr_neutral() {
        let result = compute_piqr(&PiqrInput::default());
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_piqr_compliance_and_warnings() {
        let result = compute_piqr(&PiqrInput {
            compliance_fails: 2,
            warning_multipliers: vec![1.1, 1.2],
            ..PiqrInput::default()
        });
        // 1.5 * 1.32
        assert!((result.value - 1.98).abs() < 1e-9);
    }

    #[test]
    fn test_piqr_latency_penalty_capped() {
        let result = compute_piqr(&PiqrInput {
            schema_latency_minutes: 90.0,
            latency_budget_minutes: 30.0,
            ..PiqrInput::default()
        });
        assert_eq!(result.value, 2.0);
    }

    #[test]
    fn test_piqr_latency_under_budget_is_neutral() {
        let result = compute_piqr(&PiqrInput {
            schema_latency_minutes: 10.0,
            latency_budget_minutes: 30.0,
            ..PiqrInput::default()
        });
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_piqr_huge_multipliers_are_capped() {
        let result = compute_piqr(&PiqrInput {
            warning_multipliers: vec![1e200, 1e200],
            ..PiqrInput::default()
        });
        assert_eq!(result.value, PIQR_MAX);
        assert!(result.factors.iter().all(|f| f.value.is_finite()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["value"], serde_json::json!(PIQR_MAX));
    }

    #[test]
    fn test_piqr_duplicate_penalty_capped() {
        let result = compute_piqr(&PiqrInput {
            duplicate_rate: 0.9,
            ..PiqrInput::default()
        });
        assert_eq!(result.value, 1.5);
    }

    #[test]
    fn test_seo_all_max() {
        let result = compute_seo(&SeoInput {
            organic_traffic: 1.0,
            keyword_rankings: 1.0,
            local_pack_share: 1.0,
            branded_ctr: 1.0,
        });
        assert!((result.value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_aeo_normalized() {
        let result = compute_aeo(&AeoInput {
            featured_snippets: 1.0,
            paa_capture_rate: 1.0,
            ai_overview_citations: 1.0,
            voice_search_share: 1.0,
        });
        assert!((result.value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_geo_neutral_sentiment() {
        let result = compute_geo(&GeoInput {
            llm_mentions: 0.0,
            llm_sentiment: 0.0,
            authority_links: 0.0,
        });
        // sentiment 0 maps to 0.5 -> 0.5 * 0.30 * 100
        assert!((result.value - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_hrp_zero_mentions() {
        let result = compute_hrp(&HrpInput {
            total_mentions: 0,
            verifiable_mentions: 0,
            severity: 0.5,
        });
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_hrp_capped_at_one() {
        let result = compute_hrp(&HrpInput {
            total_mentions: 10,
            verifiable_mentions: 2,
            severity: 1.0,
        });
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_hrp_partial() {
        let result = compute_hrp(&HrpInput {
            total_mentions: 10,
            verifiable_mentions: 8,
            severity: 0.5,
        });
        assert!((result.value - 0.3).abs() < 1e-9);
    }

    fn strong_eeat() -> EeatInput {
        EeatInput {
            bounce_rate: 0.0,
            time_on_site_secs: 600.0,
            pages_per_session: 8.0,
            content_depth_words: 3000.0,
            authorship_completeness: 1.0,
            technical_accuracy: 1.0,
            domain_authority: 1.0,
            backlink_quality: 1.0,
            brand_mentions: 250,
            ssl_cert: true,
            privacy_policy: true,
            contact_info_complete: true,
            review_rating: 5.0,
            review_response_rate: 1.0,
        }
    }

    #[test]
    fn test_eeat_saturates_at_100() {
        let dims = eeat_dimensions(&strong_eeat());
        assert!((dims.experience - 100.0).abs() < 1e-9);
        assert!((dims.trustworthiness - 100.0).abs() < 1e-9);
        assert!((compute_eeat(&strong_eeat()).value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_eeat_trust_flags() {
        let mut input = strong_eeat();
        input.ssl_cert = false;
        let dims = eeat_dimensions(&input);
        assert!((dims.trustworthiness - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_qai_weighted_mean() {
        let result = compute_qai(&QaiInput {
            components: vec![
                QaiComponent {
                    id: "QAI-PROC".to_string(),
                    weight: 3.0,
                    score: 80.0,
                },
                QaiComponent {
                    id: "QAI-CERT".to_string(),
                    weight: 1.0,
                    score: 40.0,
                },
            ],
        });
        assert!((result.value - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_qai_no_components() {
        let result = compute_qai(&QaiInput { components: vec![] });
        assert_eq!(result.value, 0.0);
    }

    fn win_input(v: f64) -> WinProbabilityInput {
        WinProbabilityInput {
            ai_visibility: v,
            review_trust: v,
            schema_coverage: v,
            gbp_health: v,
            zero_click: v,
        }
    }

    #[test]
    fn test_win_probability_extremes() {
        assert_eq!(win_probability(&win_input(100.0)).value, 100.0);
        assert_eq!(win_probability(&win_input(0.0)).value, 0.0);
    }

    #[test]
    fn test_win_probability_rounds() {
        let result = win_probability(&WinProbabilityInput {
            ai_visibility: 71.0,
            review_trust: 60.0,
            schema_coverage: 55.0,
            gbp_health: 90.0,
            zero_click: 33.0,
        });
        // 21.3 + 15 + 11 + 13.5 + 3.3 = 64.1
        assert_eq!(result.value, 64.0);
    }

    #[test]
    fn test_scores_stay_in_bounds_for_wild_input() {
        let wild = [-5.0, 0.0, 1e-160, 0.37, 1.0, 7.5, 1e200, f64::NAN, f64::INFINITY];
        for v in wild {
            let scores = [
                compute_scs(
                    &ScsInput {
                        parsed_fields: 3,
                        expected_fields: 2,
                        validation_health: v,
                        source_trust: v,
                    },
                    2,
                ),
                compute_relevance(&RelevanceInput {
                    visibility: v,
                    proximity: v,
                    authority: v,
                    scs_pct: v * 100.0,
                }),
                compute_piqr(&PiqrInput {
                    compliance_fails: 1,
                    warning_multipliers: vec![v, v],
                    schema_latency_minutes: v,
                    latency_budget_minutes: 1.0,
                    duplicate_rate: v,
                }),
                compute_seo(&SeoInput {
                    organic_traffic: v,
                    keyword_rankings: v,
                    local_pack_share: v,
                    branded_ctr: v,
                }),
                compute_geo(&GeoInput {
                    llm_mentions: v,
                    llm_sentiment: v,
                    authority_links: v,
                }),
                compute_aeo(&AeoInput {
                    featured_snippets: v,
                    paa_capture_rate: v,
                    ai_overview_citations: v,
                    voice_search_share: v,
                }),
                compute_hrp(&HrpInput {
                    total_mentions: 3,
                    verifiable_mentions: 5,
                    severity: v,
                }),
                compute_hrp(&HrpInput {
                    total_mentions: 4,
                    verifiable_mentions: 1,
                    severity: v,
                }),
                compute_eeat(&EeatInput {
                    bounce_rate: v,
                    time_on_site_secs: v * 300.0,
                    pages_per_session: v * 5.0,
                    content_depth_words: v * 2000.0,
                    authorship_completeness: v,
                    technical_accuracy: v,
                    domain_authority: v,
                    backlink_quality: v,
                    brand_mentions: 500,
                    ssl_cert: true,
                    privacy_policy: true,
                    contact_info_complete: true,
                    review_rating: v * 5.0,
                    review_response_rate: v,
                }),
                compute_qai(&QaiInput {
                    components: vec![
                        QaiComponent {
                            id: "QAI-PROC".to_string(),
                            weight: v,
                            score: v * 100.0,
                        },
                        QaiComponent {
                            id: "QAI-CONTENT".to_string(),
                            weight: 1.0,
                            score: 80.0,
                        },
                    ],
                }),
                win_probability(&win_input(v * 100.0)),
            ];
            for score in &scores {
                assert!(in_bounds(score), "{:?} out of bounds for {}", score, v);
            }
        }
    }

    #[test]
    fn test_scorers_are_idempotent() {
        let input = PiqrInput {
            compliance_fails: 1,
            warning_multipliers: vec![1.05],
            schema_latency_minutes: 45.0,
            latency_budget_minutes: 30.0,
            duplicate_rate: 0.1,
        };
        assert_eq!(compute_piqr(&input), compute_piqr(&input));
        assert_eq!(compute_scs(&full_scs(), 3), compute_scs(&full_scs(), 3));
    }
}
