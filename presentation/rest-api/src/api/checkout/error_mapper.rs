use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::checkout::errors::CheckoutError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for CheckoutError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let message = match &self {
            CheckoutError::InvalidLine { index, reason } => {
                format!("checkout.invalid_line.{}: {}", index, reason)
            }
            CheckoutError::EmptyCart => "checkout.empty_cart".to_string(),
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("ValidationError", &message)),
        )
    }
}
