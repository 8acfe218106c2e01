use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bounds::{clamp_percent, clamp_to, clamp_unit, population_variance, safe_ratio};
use super::breakdown::{CompositeIndex, Factor, Index};
use super::weights::EngineWeights;

const HRP_WEIGHT: f64 = 0.20;

/// Smallest variance used for CRS weighting; caps a weight at 1e6.
const CRS_MIN_VARIANCE: f64 = 1e-6;

/// Authority velocity is reported in percent and capped at a tenfold gain.
const MAX_AUTHORITY_VELOCITY: f64 = 1000.0;

fn weighted_sum(factors: &[Factor]) -> f64 {
    factors.iter().map(|f| f.weight * f.value).sum()
}

/// AI Visibility Index, 0-100.
///
/// Weighted mean over the engines that were actually measured, divided by
/// the PIQR penalty (which is never below 1).
pub fn compute_aiv(
    engine_scores: &BTreeMap<String, f64>,
    weights: &EngineWeights,
    piqr: f64,
) -> CompositeIndex {
    let components: Vec<Factor> = engine_scores
        .iter()
        .map(|(engine, score)| {
            let weight = weights.get(engine).max(0.0);
            let factor = Factor::new(engine, weight, clamp_percent(*score));
            if weight == 0.0 {
                factor.with_note("not in engine registry")
            } else {
                factor
            }
        })
        .collect();

    let measured_weight: f64 = components.iter().map(|f| f.weight).sum();
    let visibility = safe_ratio(weighted_sum(&components), measured_weight);
    let penalty = if piqr.is_finite() { piqr.max(1.0) } else { 1.0 };

    CompositeIndex {
        index: Index::Aiv,
        value: clamp_percent(visibility / penalty),
        components,
    }
}

/// SEO/AEO/GEO combined into one 0-100 visibility figure.
pub fn blend_visibility(seo: f64, aeo: f64, geo: f64) -> f64 {
    clamp_percent(clamp_percent(seo) * 0.35 + clamp_percent(aeo) * 0.35 + clamp_percent(geo) * 0.30)
}

/// Trust signal inputs for the ATI, each 0-100.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtiInput {
    pub schema_consistency: f64,
    pub review_legitimacy: f64,
    pub topical_authority: f64,
    pub source_credibility: f64,
}

/// Algorithmic Trust Index, 0-100.
pub fn compute_ati(input: &AtiInput) -> CompositeIndex {
    let components = vec![
        Factor::new("Schema consistency", 0.30, clamp_percent(input.schema_consistency)),
        Factor::new("Review legitimacy", 0.30, clamp_percent(input.review_legitimacy)),
        Factor::new("Topical authority", 0.20, clamp_percent(input.topical_authority)),
        Factor::new("Source credibility", 0.20, clamp_percent(input.source_credibility)),
    ];
    CompositeIndex {
        index: Index::Ati,
        value: clamp_percent(weighted_sum(&components)),
        components,
    }
}

/// Composite Reputation Score: AIV and ATI fused by inverse variance, so
/// the steadier signal counts for more. Zero variance means weight 1;
/// positive variances are floored at 1e-6 so the weights
/// stay finite.
pub fn compute_crs(aiv: f64, ati: f64, variance_aiv: f64, variance_ati: f64) -> CompositeIndex {
    let inverse = |variance: f64| {
        if variance > 0.0 {
            1.0 / variance.max(CRS_MIN_VARIANCE)
        } else {
            1.0
        }
    };
    let w_aiv = inverse(variance_aiv);
    let w_ati = inverse(variance_ati);
    let total = w_aiv + w_ati;

    let components = vec![
        Factor::new("AIV", safe_ratio(w_aiv, total), clamp_percent(aiv))
            .with_note(format!("variance {:.2}", variance_aiv)),
        Factor::new("ATI", safe_ratio(w_ati, total), clamp_percent(ati))
            .with_note(format!("variance {:.2}", variance_ati)),
    ];
    CompositeIndex {
        index: Index::Crs,
        value: clamp_percent(weighted_sum(&components)),
        components,
    }
}

/// Digital Trust Revenue Index: internal execution (QAI) and external
/// perception (E-E-A-T) weighted evenly.
pub fn compute_dtri(qai: f64, eeat: f64) -> CompositeIndex {
    let components = vec![
        Factor::new("QAI", 0.50, clamp_percent(qai)),
        Factor::new("E-E-A-T", 0.50, clamp_percent(eeat)),
    ];
    CompositeIndex {
        index: Index::Dtri,
        value: clamp_percent(weighted_sum(&components)),
        components,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaiStarInput {
    pub seo: f64,
    pub aiv: f64,
    /// Hallucination risk penalty, 0-1
    #[serde(default)]
    pub hrp: f64,
    /// Current blended visibility, compared against `previous_visibility`
    pub visibility: f64,
    #[serde(default)]
    pub previous_visibility: Option<f64>,
}

/// Authority velocity in percent: growth of visibility since the last
/// measurement. Zero without a usable previous value.
pub fn authority_velocity(visibility: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev > 0.0 => clamp_to(
            (visibility - prev) / prev * 100.0,
            -100.0,
            MAX_AUTHORITY_VELOCITY,
        ),
        _ => 0.0,
    }
}

/// QAI*: `(SEO*0.3 + AIV*0.7) * (1 + velocity) - HRP*0.2`, 0-100.
pub fn compute_qai_star(input: &QaiStarInput) -> CompositeIndex {
    let velocity = authority_velocity(input.visibility, input.previous_visibility);
    let multiplier = 1.0 + velocity / 100.0;
    let hrp = clamp_unit(input.hrp);

    let components = vec![
        Factor::new("SEO", 0.30, clamp_percent(input.seo)),
        Factor::new("AIV", 0.70, clamp_percent(input.aiv)),
        Factor::new("Authority velocity", multiplier, velocity)
            .with_note("percent change in visibility"),
        Factor::new("HRP", HRP_WEIGHT, hrp),
    ];
    let raw = (components[0].weight * components[0].value
        + components[1].weight * components[1].value)
        * multiplier
        - hrp * 100.0 * HRP_WEIGHT;

    CompositeIndex {
        index: Index::QaiStar,
        value: clamp_percent(raw),
        components,
    }
}

/// Everything the composite route needs in one body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeInput {
    pub engine_scores: BTreeMap<String, f64>,
    #[serde(default = "neutral_piqr")]
    pub piqr: f64,
    pub ati: AtiInput,
    /// Recent AIV readings used to weigh the CRS
    #[serde(default)]
    pub aiv_history: Vec<f64>,
    #[serde(default)]
    pub ati_history: Vec<f64>,
    pub qai: f64,
    pub eeat: f64,
}

fn neutral_piqr() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeReport {
    pub aiv: CompositeIndex,
    pub ati: CompositeIndex,
    pub crs: CompositeIndex,
    pub dtri: CompositeIndex,
}

pub fn compute_composites(input: &CompositeInput, weights: &EngineWeights) -> CompositeReport {
    let aiv = compute_aiv(&input.engine_scores, weights, input.piqr);
    let ati = compute_ati(&input.ati);
    let crs = compute_crs(
        aiv.value,
        ati.value,
        population_variance(&input.aiv_history),
        population_variance(&input.ati_history),
    );
    let dtri = compute_dtri(input.qai, input.eeat);
    CompositeReport {
        aiv,
        ati,
        crs,
        dtri,
    }
}
