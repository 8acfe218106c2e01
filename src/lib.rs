//! Dealership AI-visibility scoring.
//!
//! Pure pillar and composite formulas live in [`scoring`], dollar models in
//! [`attribution`]; [`server`] exposes both over JSON HTTP.

pub mod attribution;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod server;

pub use error::{ScoreError, ValidationResult};
