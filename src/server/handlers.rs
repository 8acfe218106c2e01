use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::attribution::{
    compute_dtri_financials, compute_forecast, compute_improvement, compute_oci, compute_oel,
    compute_rar, AttributionResult, DtriFinancialInput, DtriFinancials, Forecast, ForecastInput,
    ImprovementInput, OciInput, OelInput, RarInput, RarReport,
};
use crate::attribution::lift::OpportunityCost;
use crate::attribution::revenue::ImprovementImpact;
use crate::scoring::composite::{compute_qai_star, QaiStarInput};
use crate::scoring::input::WinProbabilityInput;
use crate::scoring::{
    compute_composites, score_document, win_probability, CompositeIndex, CompositeInput,
    CompositeReport, Pillar, PillarScore, Validate, WIN_PROBABILITY_WEIGHTS,
};

use super::error::ApiError;
use super::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Unwraps a JSON body and runs its range checks.
fn accept<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(input)
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WeightsResponse {
    engines: BTreeMap<String, f64>,
    win_probability: BTreeMap<&'static str, f64>,
}

pub(crate) async fn weights_handler(State(state): State<AppState>) -> Json<WeightsResponse> {
    Json(WeightsResponse {
        engines: state.weights.effective().into_iter().collect(),
        win_probability: WIN_PROBABILITY_WEIGHTS.into_iter().collect(),
    })
}

pub(crate) async fn win_prob_handler(
    query: Result<Query<WinProbabilityInput>, QueryRejection>,
) -> ApiResult<PillarScore> {
    let Query(input) = query?;
    input.validate()?;
    Ok(Json(win_probability(&input)))
}

/// Every pillar answers with the same [`PillarScore`] shape. The headline
/// number is always `value`: for SCS that is the coverage percentage
/// (`scsPct` in the formula notation), for relevance the index `ri`.
pub(crate) async fn score_handler(
    Path(slug): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PillarScore> {
    let pillar = Pillar::from_slug(&slug).ok_or(ApiError::UnknownPillar(slug))?;
    let Json(doc) = payload?;
    Ok(Json(score_document(pillar, doc)?))
}

pub(crate) async fn composite_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompositeInput>, JsonRejection>,
) -> ApiResult<CompositeReport> {
    let input = accept(payload)?;
    Ok(Json(compute_composites(&input, &state.weights)))
}

pub(crate) async fn qai_star_handler(
    payload: Result<Json<QaiStarInput>, JsonRejection>,
) -> ApiResult<CompositeIndex> {
    let input = accept(payload)?;
    Ok(Json(compute_qai_star(&input)))
}

pub(crate) async fn oel_handler(
    State(state): State<AppState>,
    payload: Result<Json<OelInput>, JsonRejection>,
) -> ApiResult<AttributionResult> {
    let input = accept(payload)?;
    Ok(Json(compute_oel(&input, &state.lift)))
}

pub(crate) async fn oci_handler(
    State(state): State<AppState>,
    payload: Result<Json<OciInput>, JsonRejection>,
) -> ApiResult<OpportunityCost> {
    let input = accept(payload)?;
    Ok(Json(compute_oci(&input, &state.lift)))
}

pub(crate) async fn rar_handler(
    State(state): State<AppState>,
    payload: Result<Json<RarInput>, JsonRejection>,
) -> ApiResult<RarReport> {
    let input = accept(payload)?;
    let report = compute_rar(&input, &state.percentile_bands);
    tracing::info!(
        dealer = %report.dealer_id,
        monthly = report.monthly_revenue_at_risk,
        "revenue at risk computed"
    );
    Ok(Json(report))
}

pub(crate) async fn improvement_handler(
    payload: Result<Json<ImprovementInput>, JsonRejection>,
) -> ApiResult<ImprovementImpact> {
    let input = accept(payload)?;
    Ok(Json(compute_improvement(&input)))
}

pub(crate) async fn forecast_handler(
    payload: Result<Json<ForecastInput>, JsonRejection>,
) -> ApiResult<Forecast> {
    let input = accept(payload)?;
    Ok(Json(compute_forecast(&input)))
}

pub(crate) async fn dtri_handler(
    payload: Result<Json<DtriFinancialInput>, JsonRejection>,
) -> ApiResult<DtriFinancials> {
    let input = accept(payload)?;
    Ok(Json(compute_dtri_financials(&input)))
}
