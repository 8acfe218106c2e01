use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Score range expression used by configurable bands.
/// Formats: "<N", "<=N", ">N", ">=N", "N-M" (inclusive), or a bare "N".
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64),
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if let Some((low, high)) = s.split_once('-').filter(|_| !s.starts_with('-')) {
            let low: f64 = low.trim().parse()?;
            let high: f64 = high.trim().parse()?;
            if low > high {
                bail!("Range start {} is above end {}", low, high)
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// Maps a visibility score range to a market percentile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PercentileBand {
    pub range: String,
    pub percentile: u8,
}

pub fn default_percentile_bands() -> Vec<PercentileBand> {
    [
        (">=90", 95),
        (">=85", 90),
        (">=80", 80),
        (">=75", 70),
        (">=70", 60),
        (">=65", 50),
        (">=60", 40),
        (">=55", 30),
        (">=50", 20),
        ("<50", 10),
    ]
    .into_iter()
    .map(|(range, percentile)| PercentileBand {
        range: range.to_string(),
        percentile,
    })
    .collect()
}

/// First matching band wins. Unparseable bands are skipped (config
/// validation reports them at startup); no match means the 10th percentile.
pub fn percentile_for(score: f64, bands: &[PercentileBand]) -> u8 {
    bands
        .iter()
        .find(|band| {
            RangeOp::parse(&band.range)
                .map(|range| range.matches(score))
                .unwrap_or(false)
        })
        .map(|band| band.percentile)
        .unwrap_or(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_less_than() {
        let range = RangeOp::parse("<50").unwrap();
        assert!(range.matches(49.9));
        assert!(!range.matches(50.0));
    }

    #[test]
    fn test_parse_range_greater_equal() {
        let range = RangeOp::parse(">= 90").unwrap();
        assert!(range.matches(90.0));
        assert!(!range.matches(89.99));
    }

    #[test]
    fn test_parse_range_between() {
        let range = RangeOp::parse("60-69.5").unwrap();
        assert!(range.matches(60.0));
        assert!(range.matches(69.5));
        assert!(!range.matches(69.6));
    }

    #[test]
    fn test_parse_range_inverted_is_error() {
        assert!(RangeOp::parse("80-60").is_err());
    }

    #[test]
    fn test_parse_range_garbage() {
        assert!(RangeOp::parse("lots").is_err());
    }

    #[test]
    fn test_percentile_first_match_wins() {
        let bands = default_percentile_bands();
        assert_eq!(percentile_for(92.0, &bands), 95);
        assert_eq!(percentile_for(86.0, &bands), 90);
        assert_eq!(percentile_for(65.0, &bands), 50);
        assert_eq!(percentile_for(12.0, &bands), 10);
    }

    #[test]
    fn test_percentile_no_bands() {
        assert_eq!(percentile_for(99.0, &[]), 10);
    }
}
