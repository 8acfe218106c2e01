use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::error::ScoreError;
use crate::scoring::DispatchError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<ScoreError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("unknown pillar '{0}'")]
    UnknownPillar(String),

    #[error("request timed out")]
    Timeout,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownPillar(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(crate) fn api_error_response(status: StatusCode, err: &ApiError) -> Response {
    let body = match err {
        ApiError::Validation(details) => json!({"error": err.to_string(), "details": details}),
        _ => json!({"error": err.to_string()}),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(e) => tracing::error!(error = %e, "request failed"),
            other => tracing::debug!(status = status.as_u16(), error = %other, "request rejected"),
        }
        api_error_response(status, &self)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<Vec<ScoreError>> for ApiError {
    fn from(errors: Vec<ScoreError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Invalid { errors, .. } => ApiError::Validation(errors),
            malformed @ DispatchError::Malformed { .. } => ApiError::BadRequest(malformed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnknownPillar("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("secret path /etc/x"));
        assert_eq!(err.to_string(), "internal error");
    }
}
