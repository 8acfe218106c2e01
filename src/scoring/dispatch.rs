//! Scores a loosely-typed document against a pillar chosen at runtime.
//!
//! Shared by the HTTP `/api/scores/{pillar}` route and `dealer-score score`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::ScoreError;

use super::breakdown::{Pillar, PillarScore};
use super::input::{
    AeoInput, EeatInput, GeoInput, HrpInput, PiqrInput, QaiInput, RelevanceInput, ScsInput,
    SeoInput, WinProbabilityInput,
};
use super::pillars;
use super::validation::Validate;

/// SCS body: the coverage record plus how many schema errors were found.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScsRequest {
    #[serde(flatten)]
    pub input: ScsInput,
    #[serde(default)]
    pub errors_detected: u32,
}

impl Validate for ScsRequest {
    fn validate(&self) -> crate::error::ValidationResult {
        self.input.validate()
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("malformed {pillar} input: {source}")]
    Malformed {
        pillar: Pillar,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {pillar} input ({} problems)", .errors.len())]
    Invalid {
        pillar: Pillar,
        errors: Vec<ScoreError>,
    },
}

fn parse<T>(pillar: Pillar, doc: Value) -> Result<T, DispatchError>
where
    T: DeserializeOwned + Validate,
{
    let input: T =
        serde_json::from_value(doc).map_err(|source| DispatchError::Malformed { pillar, source })?;
    input
        .validate()
        .map_err(|errors| DispatchError::Invalid { pillar, errors })?;
    Ok(input)
}

pub fn score_document(pillar: Pillar, doc: Value) -> Result<PillarScore, DispatchError> {
    let score = match pillar {
        Pillar::Scs => {
            let request: ScsRequest = parse(pillar, doc)?;
            pillars::compute_scs(&request.input, request.errors_detected)
        }
        Pillar::Relevance => pillars::compute_relevance(&parse::<RelevanceInput>(pillar, doc)?),
        Pillar::Piqr => pillars::compute_piqr(&parse::<PiqrInput>(pillar, doc)?),
        Pillar::Seo => pillars::compute_seo(&parse::<SeoInput>(pillar, doc)?),
        Pillar::Aeo => pillars::compute_aeo(&parse::<AeoInput>(pillar, doc)?),
        Pillar::Geo => pillars::compute_geo(&parse::<GeoInput>(pillar, doc)?),
        Pillar::Hrp => pillars::compute_hrp(&parse::<HrpInput>(pillar, doc)?),
        Pillar::Eeat => pillars::compute_eeat(&parse::<EeatInput>(pillar, doc)?),
        Pillar::Qai => pillars::compute_qai(&parse::<QaiInput>(pillar, doc)?),
        Pillar::WinProbability => {
            pillars::win_probability(&parse::<WinProbabilityInput>(pillar, doc)?)
        }
    };
    tracing::debug!(%pillar, value = score.value, "scored");
    Ok(score)
}
