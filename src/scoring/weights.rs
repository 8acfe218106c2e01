use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-engine weights used by the AIV composite.
///
/// Keys are lowercase engine names. When the config omits `engines`
/// entirely, the built-in defaults apply.
///
/// Example YAML:
/// ```yaml
/// engines:
///   chatgpt: 0.35
///   perplexity: 0.25
///   gemini: 0.25
///   copilot: 0.15
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct EngineWeights(BTreeMap<String, f64>);

impl From<BTreeMap<String, f64>> for EngineWeights {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self::from_pairs(map.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl From<EngineWeights> for BTreeMap<String, f64> {
    fn from(weights: EngineWeights) -> Self {
        weights.0
    }
}

impl Default for EngineWeights {
    fn default() -> Self {
        Self::from_pairs([
            ("chatgpt", 0.35),
            ("perplexity", 0.25),
            ("gemini", 0.25),
            ("copilot", 0.15),
        ])
    }
}

impl EngineWeights {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, w)| (normalize_engine(name), w))
                .collect(),
        )
    }

    /// Weight for an engine, case-insensitive. Unknown engines weigh nothing.
    pub fn get(&self, engine: &str) -> f64 {
        self.0.get(&normalize_engine(engine)).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().filter(|w| **w > 0.0).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weights rescaled to sum to 1.0. Negative weights are dropped.
    pub fn effective(&self) -> Vec<(String, f64)> {
        let total = self.total();
        self.0
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(k, w)| (k.clone(), if total > 0.0 { w / total } else { 0.0 }))
            .collect()
    }
}

fn normalize_engine(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
