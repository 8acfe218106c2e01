use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::attribution::RarReport;
use crate::scoring::{Factor, PillarScore, Scale};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score for its scale: "72.4" (percent), "0.36" (unit), "1.25x" (multiplier)
pub fn format_score(value: f64, scale: Scale) -> String {
    match scale {
        Scale::Percent => format!("{:.1}", value),
        Scale::Unit => format!("{:.2}", value),
        Scale::Multiplier => format!("{:.2}x", value),
    }
}

fn scale_suffix(scale: Scale) -> &'static str {
    match scale {
        Scale::Percent => " / 100",
        Scale::Unit => " / 1",
        Scale::Multiplier => "",
    }
}

/// Format dollars in compact notation ($1.5M, $21k, $847)
pub fn format_money(amount: f64) -> String {
    let abs = amount.abs();
    let formatted = if abs >= 1_000_000.0 {
        format!("{:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", abs / 1_000.0)
    } else {
        format!("{:.0}", abs)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    let trimmed = formatted.replace(".0M", "M").replace(".0k", "k");

    if amount < 0.0 && trimmed != "0" {
        format!("-${}", trimmed)
    } else {
        format!("${}", trimmed)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format factor rows: label, weight, value, and an optional note that is
/// truncated to the terminal width.
fn format_factors(factors: &[Factor], use_colors: bool) -> Vec<String> {
    let label_width = factors
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);
    let term_width = get_terminal_width();

    factors
        .iter()
        .map(|factor| {
            let label = format!("{:<width$}", factor.label, width = label_width);
            let weight = format!("{:>6.2}", factor.weight);
            let value = format!("{:>8.2}", factor.value);
            // "  " + label + "  w " + weight + "  " + value + "  "
            let fixed_width = 2 + label_width + 4 + weight.len() + 2 + value.len() + 2;
            let note = factor.note.as_deref().map(|note| match term_width {
                Some(width) if width > fixed_width + 10 => truncate(note, width - fixed_width),
                Some(_) => truncate(note, 20),
                None => note.to_string(),
            });

            let line = if use_colors {
                format!("  {}  w {}  {}", label, weight.dimmed(), value.bold())
            } else {
                format!("  {}  w {}  {}", label, weight, value)
            };
            match note {
                Some(note) if use_colors => format!("{}  {}", line, note.dimmed()),
                Some(note) => format!("{}  {}", line, note),
                None => line,
            }
        })
        .collect()
}

/// Format a pillar score with its factor breakdown
pub fn format_breakdown(score: &PillarScore, use_colors: bool) -> String {
    let value = format_score(score.value, score.scale);
    let header = if use_colors {
        format!(
            "{}  {}{}",
            score.pillar.label().bold(),
            value.green().bold(),
            scale_suffix(score.scale).dimmed()
        )
    } else {
        format!("{}  {}{}", score.pillar.label(), value, scale_suffix(score.scale))
    };

    let mut lines = vec![header];
    lines.extend(format_factors(&score.factors, use_colors));
    lines.join("\n")
}

/// Format normalized engine weights as an aligned two-column table
pub fn format_weights_table(weights: &[(String, f64)], use_colors: bool) -> String {
    if weights.is_empty() {
        return "No engines configured.".to_string();
    }
    let name_width = weights.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    weights
        .iter()
        .map(|(name, weight)| {
            let name = format!("{:<width$}", name, width = name_width);
            let pct = format!("{:>5.1}%", weight * 100.0);
            if use_colors {
                format!("{}  {}", name.cyan(), pct.bold())
            } else {
                format!("{}  {}", name, pct)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a revenue-at-risk report as a short summary
pub fn format_rar_summary(report: &RarReport, use_colors: bool) -> String {
    let monthly = format_money(report.monthly_revenue_at_risk);
    let annual = format_money(report.annual_revenue_at_risk);
    let headline = if use_colors {
        format!(
            "{}  {} / month ({} / year)",
            report.dealer_id.bold(),
            monthly.red().bold(),
            annual.red()
        )
    } else {
        format!("{}  {} / month ({} / year)", report.dealer_id, monthly, annual)
    };

    let mut lines = vec![
        headline,
        format!(
            "  Confidence: {:.0}%  Percentile: {}",
            report.confidence * 100.0,
            report.benchmark.percentile_rank
        ),
        format!(
            "  Organic {}  AI {}  Local {}  Social {}",
            format_money(report.breakdown.organic_search),
            format_money(report.breakdown.ai_search),
            format_money(report.breakdown.local_search),
            format_money(report.breakdown.social_media)
        ),
    ];
    for rec in &report.recommendations {
        let priority = format!("{:?}", rec.priority).to_lowercase();
        lines.push(format!(
            "  [{}] {} ({}, {})",
            priority,
            rec.action,
            format_money(rec.estimated_impact),
            rec.effort
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::{compute_rar, RarInput};
    use crate::attribution::revenue::VisibilityScores;
    use crate::scoring::{default_percentile_bands, Pillar};

    fn sample_score() -> PillarScore {
        PillarScore::new(
            Pillar::Seo,
            72.44,
            vec![
                Factor::new("Organic traffic", 0.25, 0.8),
                Factor::new("Local pack", 0.35, 0.6).with_note("top-3 share"),
            ],
        )
    }

    #[test]
    fn test_format_score_scales() {
        assert_eq!(format_score(72.44, Scale::Percent), "72.4");
        assert_eq!(format_score(0.356, Scale::Unit), "0.36");
        assert_eq!(format_score(1.25, Scale::Multiplier), "1.25x");
    }

    #[test]
    fn test_format_breakdown_plain() {
        let result = format_breakdown(&sample_score(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "SEO  72.4 / 100");
        assert!(lines[1].starts_with("  Organic traffic  w   0.25"));
        assert!(lines[2].contains("Local pack"));
        assert!(lines[2].ends_with("top-3 share"));
    }

    #[test]
    fn test_format_breakdown_no_factors() {
        let score = PillarScore::new(Pillar::Piqr, 1.0, vec![]);
        assert_eq!(format_breakdown(&score, false), "PIQR  1.00x");
    }

    #[test]
    fn test_format_money_small() {
        assert_eq!(format_money(847.0), "$847");
    }

    #[test]
    fn test_format_money_zero() {
        assert_eq!(format_money(0.0), "$0");
    }

    #[test]
    fn test_format_money_thousand_exact() {
        assert_eq!(format_money(21_000.0), "$21k");
    }

    #[test]
    fn test_format_money_thousand_decimal() {
        assert_eq!(format_money(1_500.0), "$1.5k");
    }

    #[test]
    fn test_format_money_million() {
        assert_eq!(format_money(2_300_000.0), "$2.3M");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(-21_000.0), "-$21k");
    }

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("Short note", 20), "Short note");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("This note is far too long", 10), "This no...");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("Größenänderung", 8), "Größe...");
    }

    #[test]
    fn test_weights_table() {
        let weights = vec![("chatgpt".to_string(), 0.35), ("copilot".to_string(), 0.15)];
        let result = format_weights_table(&weights, false);
        assert_eq!(result, "chatgpt   35.0%\ncopilot   15.0%");
    }

    #[test]
    fn test_weights_table_empty() {
        assert_eq!(format_weights_table(&[], false), "No engines configured.");
    }

    #[test]
    fn test_rar_summary() {
        let report = compute_rar(
            &RarInput {
                dealer_id: "dealer-42".to_string(),
                brand: "Ford".to_string(),
                city: None,
                scores: VisibilityScores {
                    overall: 55.0,
                    seo: 55.0,
                    aeo: 55.0,
                    geo: 55.0,
                    social: 55.0,
                },
            },
            &default_percentile_bands(),
        );
        let result = format_rar_summary(&report, false);
        assert!(result.starts_with("dealer-42  $15k / month ($180k / year)"));
        assert!(result.contains("Percentile: 30"));
        assert!(result.contains("[high]"));
    }
}
