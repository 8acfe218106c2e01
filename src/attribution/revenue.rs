use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::scoring::bands::{percentile_for, PercentileBand};
use crate::scoring::bounds::{clamp_percent, clamp_to, population_variance};
use crate::scoring::validation::{Checks, Validate};

const LUXURY_BRANDS: [&str; 7] = [
    "bmw",
    "mercedes-benz",
    "audi",
    "lexus",
    "porsche",
    "jaguar",
    "land rover",
];
const ECONOMY_BRANDS: [&str; 5] = ["kia", "hyundai", "nissan", "mitsubishi", "subaru"];

/// Channel share of the visibility gap: organic, AI, local, social.
const CHANNEL_SHARES: [f64; 4] = [0.4, 0.3, 0.2, 0.1];

/// Implementation cost per point of improvement, per channel.
const COST_PER_POINT: [f64; 4] = [500.0, 750.0, 300.0, 400.0];

const DEFAULT_MARKET_SIZE: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandTier {
    Luxury,
    Economy,
    Automotive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub average_monthly_revenue: f64,
    pub average_visibility_score: f64,
    pub elasticity_per_point: f64,
}

impl BrandTier {
    pub fn for_brand(brand: &str) -> Self {
        let brand = brand.trim().to_ascii_lowercase();
        if LUXURY_BRANDS.contains(&brand.as_str()) {
            BrandTier::Luxury
        } else if ECONOMY_BRANDS.contains(&brand.as_str()) {
            BrandTier::Economy
        } else {
            BrandTier::Automotive
        }
    }

    pub fn benchmark(self) -> Benchmark {
        match self {
            BrandTier::Luxury => Benchmark {
                average_monthly_revenue: 5_000_000.0,
                average_visibility_score: 70.0,
                elasticity_per_point: 2500.0,
            },
            BrandTier::Economy => Benchmark {
                average_monthly_revenue: 1_500_000.0,
                average_visibility_score: 60.0,
                elasticity_per_point: 1000.0,
            },
            BrandTier::Automotive => Benchmark {
                average_monthly_revenue: 2_500_000.0,
                average_visibility_score: 65.0,
                elasticity_per_point: 1500.0,
            },
        }
    }
}

/// Estimated annual auto market size for a metro, in dollars.
pub fn market_size(city: Option<&str>) -> f64 {
    match city.map(str::trim) {
        Some("New York") => 50_000_000.0,
        Some("Los Angeles") => 40_000_000.0,
        Some("Chicago") => 30_000_000.0,
        Some("Houston") => 25_000_000.0,
        Some("Phoenix") | Some("Philadelphia") => 20_000_000.0,
        Some("San Antonio") | Some("San Diego") | Some("Dallas") => 18_000_000.0,
        Some("San Jose") => 15_000_000.0,
        _ => DEFAULT_MARKET_SIZE,
    }
}

/// Per-channel visibility, each 0-100.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityScores {
    pub overall: f64,
    pub seo: f64,
    pub aeo: f64,
    pub geo: f64,
    pub social: f64,
}

impl VisibilityScores {
    fn channels(&self) -> [f64; 4] {
        [self.seo, self.aeo, self.geo, self.social]
    }

    fn all(&self) -> [f64; 5] {
        [self.overall, self.seo, self.aeo, self.geo, self.social]
    }

    fn check(&self, checks: &mut Checks, prefix: &str) {
        checks
            .percent(&format!("{}overall", prefix), self.overall)
            .percent(&format!("{}seo", prefix), self.seo)
            .percent(&format!("{}aeo", prefix), self.aeo)
            .percent(&format!("{}geo", prefix), self.geo)
            .percent(&format!("{}social", prefix), self.social);
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RarInput {
    pub dealer_id: String,
    pub brand: String,
    #[serde(default)]
    pub city: Option<String>,
    pub scores: VisibilityScores,
}

impl Validate for RarInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("rar");
        checks.require(!self.dealer_id.trim().is_empty(), "dealer_id", "must not be empty");
        self.scores.check(&mut checks, "scores.");
        checks.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub action: &'static str,
    pub estimated_impact: f64,
    pub effort: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBreakdown {
    pub organic_search: f64,
    pub ai_search: f64,
    pub local_search: f64,
    pub social_media: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub industry_average: f64,
    pub top_performers: f64,
    pub percentile_rank: u8,
    pub market_size: f64,
}

/// Revenue at Risk report for one dealership.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RarReport {
    pub dealer_id: String,
    pub tier: BrandTier,
    pub monthly_revenue_at_risk: f64,
    pub annual_revenue_at_risk: f64,
    pub elasticity_per_point: f64,
    pub confidence: f64,
    pub benchmark: BenchmarkComparison,
    pub breakdown: ChannelBreakdown,
    pub recommendations: Vec<Recommendation>,
}

/// Confidence drops as channel scores disagree with each other.
pub fn score_confidence(scores: &VisibilityScores) -> f64 {
    let stddev = population_variance(&scores.all()).sqrt();
    clamp_to(1.0 - stddev / 50.0, 0.5, 0.95)
}

fn channel_losses(scores: &VisibilityScores, benchmark: &Benchmark) -> [f64; 4] {
    let mut losses = [0.0; 4];
    for (i, score) in scores.channels().iter().enumerate() {
        let gap = benchmark.average_visibility_score - clamp_percent(*score);
        losses[i] = (gap * benchmark.elasticity_per_point * CHANNEL_SHARES[i]).max(0.0);
    }
    losses
}

fn recommendations(scores: &VisibilityScores, benchmark: &Benchmark) -> Vec<Recommendation> {
    const PLAYBOOK: [(Priority, &str, &str); 4] = [
        (
            Priority::High,
            "Improve SEO visibility through content optimization and technical fixes",
            "Medium (2-4 weeks)",
        ),
        (
            Priority::High,
            "Optimize for AI search engines with structured data and answer-focused content",
            "High (4-8 weeks)",
        ),
        (
            Priority::Medium,
            "Strengthen local presence through Google Business Profile optimization",
            "Low (1-2 weeks)",
        ),
        (
            Priority::Low,
            "Improve social media presence and engagement",
            "Medium (2-4 weeks)",
        ),
    ];

    let losses = channel_losses(scores, benchmark);
    scores
        .channels()
        .iter()
        .zip(PLAYBOOK)
        .zip(losses)
        .filter(|((score, _), _)| **score < benchmark.average_visibility_score)
        .map(|((_, (priority, action, effort)), loss)| Recommendation {
            priority,
            action,
            estimated_impact: loss,
            effort,
        })
        .collect()
}

pub fn compute_rar(input: &RarInput, bands: &[PercentileBand]) -> RarReport {
    let tier = BrandTier::for_brand(&input.brand);
    let benchmark = tier.benchmark();
    let overall = clamp_percent(input.scores.overall);

    let gap = benchmark.average_visibility_score - overall;
    let monthly = (gap * benchmark.elasticity_per_point).max(0.0);
    let [organic_search, ai_search, local_search, social_media] =
        channel_losses(&input.scores, &benchmark);

    RarReport {
        dealer_id: input.dealer_id.clone(),
        tier,
        monthly_revenue_at_risk: monthly,
        annual_revenue_at_risk: monthly * 12.0,
        elasticity_per_point: benchmark.elasticity_per_point,
        confidence: score_confidence(&input.scores),
        benchmark: BenchmarkComparison {
            industry_average: benchmark.average_monthly_revenue,
            top_performers: benchmark.average_monthly_revenue * 1.5,
            percentile_rank: percentile_for(overall, bands),
            market_size: market_size(input.city.as_deref()),
        },
        breakdown: ChannelBreakdown {
            organic_search,
            ai_search,
            local_search,
            social_media,
        },
        recommendations: recommendations(&input.scores, &benchmark),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementInput {
    pub brand: String,
    pub current: VisibilityScores,
    pub target: VisibilityScores,
}

impl Validate for ImprovementInput {
    fn validate(&self) -> ValidationResult {
        let mut checks = Checks::new("improvement");
        self.current.check(&mut checks, "current.");
        self.target.check(&mut checks, "target.");
        checks.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementImpact {
    /// Monthly revenue gained
    pub revenue_impact: f64,
    pub implementation_cost: f64,
    pub roi_percent: f64,
    /// None when the change gains nothing
    pub payback_months: Option<f64>,
}

/// What it is worth, and what it costs, to move from `current` to `target`.
pub fn compute_improvement(input: &ImprovementInput) -> ImprovementImpact {
    let benchmark = BrandTier::for_brand(&input.brand).benchmark();
    let improvement = clamp_percent(input.target.overall) - clamp_percent(input.current.overall);
    let revenue_impact = improvement * benchmark.elasticity_per_point;

    let implementation_cost: f64 = input
        .current
        .channels()
        .iter()
        .zip(input.target.channels())
        .zip(COST_PER_POINT)
        .map(|((current, target), cost)| (target - current).max(0.0) * cost)
        .sum();

    let roi_percent = if implementation_cost > 0.0 {
        revenue_impact * 12.0 / implementation_cost * 100.0
    } else {
        0.0
    };
    let payback_months = (revenue_impact > 0.0).then(|| implementation_cost / revenue_impact);

    ImprovementImpact {
        revenue_impact,
        implementation_cost,
        roi_percent,
        payback_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::bands::default_percentile_bands;

    fn uniform(v: f64) -> VisibilityScores {
        VisibilityScores {
            overall: v,
            seo: v,
            aeo: v,
            geo: v,
            social: v,
        }
    }

    fn rar_input(brand: &str, scores: VisibilityScores) -> RarInput {
        RarInput {
            dealer_id: "dealer-42".to_string(),
            brand: brand.to_string(),
            city: Some("Chicago".to_string()),
            scores,
        }
    }

    #[test]
    fn test_brand_tiers() {
        assert_eq!(BrandTier::for_brand("BMW"), BrandTier::Luxury);
        assert_eq!(BrandTier::for_brand("Land Rover"), BrandTier::Luxury);
        assert_eq!(BrandTier::for_brand("kia"), BrandTier::Economy);
        assert_eq!(BrandTier::for_brand("Ford"), BrandTier::Automotive);
    }

    #[test]
    fn test_rar_gap_times_elasticity() {
        let report = compute_rar(&rar_input("Ford", uniform(55.0)), &default_percentile_bands());
        // (65 - 55) * 1500
        assert_eq!(report.monthly_revenue_at_risk, 15_000.0);
        assert_eq!(report.annual_revenue_at_risk, 180_000.0);
        assert_eq!(report.benchmark.percentile_rank, 30);
        assert_eq!(report.benchmark.market_size, 30_000_000.0);
        assert_eq!(report.recommendations.len(), 4);
        assert!((report.breakdown.organic_search - 6_000.0).abs() < 1e-9);
        assert!((report.breakdown.social_media - 1_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_rar_above_benchmark_is_zero() {
        let report = compute_rar(&rar_input("Lexus", uniform(92.0)), &default_percentile_bands());
        assert_eq!(report.monthly_revenue_at_risk, 0.0);
        assert_eq!(report.breakdown.ai_search, 0.0);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.benchmark.percentile_rank, 95);
    }

    #[test]
    fn test_rar_recommends_only_lagging_channels() {
        let scores = VisibilityScores {
            overall: 70.0,
            seo: 80.0,
            aeo: 40.0,
            geo: 70.0,
            social: 90.0,
        };
        let report = compute_rar(&rar_input("Ford", scores), &default_percentile_bands());
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].priority, Priority::High);
        // (65 - 40) * 1500 * 0.3
        assert!((report.recommendations[0].estimated_impact - 11_250.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(score_confidence(&uniform(60.0)), 0.95);
        let scattered = VisibilityScores {
            overall: 0.0,
            seo: 100.0,
            aeo: 0.0,
            geo: 100.0,
            social: 0.0,
        };
        assert_eq!(score_confidence(&scattered), 0.5);
    }

    #[test]
    fn test_rar_validation() {
        let mut input = rar_input("Ford", uniform(50.0));
        input.dealer_id = " ".to_string();
        input.scores.aeo = 140.0;
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].field(), "rar.scores.aeo");
    }

    #[test]
    fn test_improvement_impact() {
        let impact = compute_improvement(&ImprovementInput {
            brand: "Ford".to_string(),
            current: uniform(50.0),
            target: uniform(60.0),
        });
        assert_eq!(impact.revenue_impact, 15_000.0);
        // 10 points on each channel: 5000 + 7500 + 3000 + 4000
        assert_eq!(impact.implementation_cost, 19_500.0);
        assert!((impact.payback_months.unwrap() - 1.3).abs() < 1e-9);
        assert!((impact.roi_percent - 15_000.0 * 12.0 / 19_500.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_improvement_no_gain() {
        let impact = compute_improvement(&ImprovementInput {
            brand: "Ford".to_string(),
            current: uniform(60.0),
            target: uniform(60.0),
        });
        assert_eq!(impact.revenue_impact, 0.0);
        assert_eq!(impact.implementation_cost, 0.0);
        assert!(impact.payback_months.is_none());
    }

}
