use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::attribution::LiftModel;
use crate::scoring::{default_percentile_bands, EngineWeights, PercentileBand};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-engine weights for the AI Visibility Index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<EngineWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

impl Config {
    pub fn engine_weights(&self) -> EngineWeights {
        self.engines.clone().unwrap_or_default()
    }

    pub fn revenue(&self) -> RevenueConfig {
        self.revenue.clone().unwrap_or_default()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
}

fn default_conversion_per_point() -> f64 {
    0.005
}

fn default_monthly_lead_volume() -> f64 {
    150.0
}

fn default_avg_gross_profit() -> f64 {
    2800.0
}

fn default_target_score() -> f64 {
    85.0
}

fn default_confidence() -> f64 {
    0.70
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RevenueConfig {
    #[serde(default = "default_conversion_per_point")]
    pub conversion_per_point: f64,
    #[serde(default = "default_monthly_lead_volume")]
    pub monthly_lead_volume: f64,
    #[serde(default = "default_avg_gross_profit")]
    pub avg_gross_profit: f64,
    #[serde(default = "default_target_score")]
    pub target_score: f64,
    /// Confidence reported with lift estimates
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_percentile_bands")]
    pub percentile_bands: Vec<PercentileBand>,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            conversion_per_point: default_conversion_per_point(),
            monthly_lead_volume: default_monthly_lead_volume(),
            avg_gross_profit: default_avg_gross_profit(),
            target_score: default_target_score(),
            confidence: default_confidence(),
            percentile_bands: default_percentile_bands(),
        }
    }
}

impl RevenueConfig {
    pub fn lift_model(&self) -> LiftModel {
        LiftModel {
            conversion_per_point: self.conversion_per_point,
            monthly_leads: self.monthly_lead_volume,
            avg_gross_profit: self.avg_gross_profit,
            target_score: self.target_score,
            confidence: self.confidence,
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_request_timeout() -> String {
    "10s".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Human-readable duration, e.g. "10s" or "1m 30s"
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.request_timeout)
    }
}
