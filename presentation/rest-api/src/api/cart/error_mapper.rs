use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::cart::errors::AnalysisError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for AnalysisError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            AnalysisError::Configuration => (
                StatusCode::BAD_REQUEST,
                "ConfigurationError",
                "analysis.configuration",
            ),
            AnalysisError::InvalidImage => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "analysis.invalid_image",
            ),
            AnalysisError::Upstream { .. } => {
                (StatusCode::BAD_GATEWAY, "UpstreamError", "analysis.upstream")
            }
            AnalysisError::MalformedResponse => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MalformedResponseError",
                "analysis.malformed_response",
            ),
        };

        (status, Json(ErrorResponse::new(name, message)))
    }
}
