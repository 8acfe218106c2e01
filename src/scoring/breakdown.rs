use serde::{Deserialize, Serialize};
use std::fmt;

/// Range a pillar's value is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// 0-100
    Percent,
    /// 0-1
    Unit,
    /// >= 1, used for penalties that divide other scores
    Multiplier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Seo,
    Aeo,
    Geo,
    Scs,
    Relevance,
    Piqr,
    Hrp,
    Eeat,
    Qai,
    WinProbability,
}

impl Pillar {
    pub const ALL: [Pillar; 10] = [
        Pillar::Seo,
        Pillar::Aeo,
        Pillar::Geo,
        Pillar::Scs,
        Pillar::Relevance,
        Pillar::Piqr,
        Pillar::Hrp,
        Pillar::Eeat,
        Pillar::Qai,
        Pillar::WinProbability,
    ];

    pub fn scale(self) -> Scale {
        match self {
            Pillar::Relevance | Pillar::Hrp => Scale::Unit,
            Pillar::Piqr => Scale::Multiplier,
            _ => Scale::Percent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Seo => "SEO",
            Pillar::Aeo => "AEO",
            Pillar::Geo => "GEO",
            Pillar::Scs => "SCS",
            Pillar::Relevance => "Relevance Index",
            Pillar::Piqr => "PIQR",
            Pillar::Hrp => "HRP",
            Pillar::Eeat => "E-E-A-T",
            Pillar::Qai => "QAI",
            Pillar::WinProbability => "Win Probability",
        }
    }

    /// Parse the short route/CLI name (`scs`, `win-prob`, ...).
    pub fn from_slug(slug: &str) -> Option<Pillar> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "seo" => Some(Pillar::Seo),
            "aeo" | "zero-click" => Some(Pillar::Aeo),
            "geo" => Some(Pillar::Geo),
            "scs" => Some(Pillar::Scs),
            "relevance" | "ri" => Some(Pillar::Relevance),
            "piqr" => Some(Pillar::Piqr),
            "hrp" => Some(Pillar::Hrp),
            "eeat" | "e-e-a-t" => Some(Pillar::Eeat),
            "qai" => Some(Pillar::Qai),
            "win-prob" | "win_probability" => Some(Pillar::WinProbability),
            _ => None,
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One sub-factor of a score: what went in and how heavily it counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub label: String,
    pub weight: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Factor {
    pub fn new(label: &str, weight: f64, value: f64) -> Self {
        Self {
            label: label.to_string(),
            weight,
            value,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar: Pillar,
    pub scale: Scale,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<Factor>,
}

impl PillarScore {
    pub fn new(pillar: Pillar, value: f64, factors: Vec<Factor>) -> Self {
        Self {
            pillar,
            scale: pillar.scale(),
            value,
            factors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Index {
    Aiv,
    Ati,
    Crs,
    Dtri,
    QaiStar,
}

/// A top-line index built from pillar outputs. Always 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeIndex {
    pub index: Index,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Factor>,
}
