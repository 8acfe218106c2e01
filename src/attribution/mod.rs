//! Dollar-denominated models built on top of the scores.

pub mod financial;
pub mod forecast;
pub mod lift;
pub mod revenue;

pub use financial::{compute_dtri_financials, DtriFinancialInput, DtriFinancials, Trigger};
pub use forecast::{compute_forecast, forecast_impact, forecast_series, Forecast, ForecastInput};
pub use lift::{compute_oci, compute_oel, AttributionResult, LiftModel, OciInput, OelInput, Period};
pub use revenue::{compute_improvement, compute_rar, ImprovementInput, RarInput, RarReport};
