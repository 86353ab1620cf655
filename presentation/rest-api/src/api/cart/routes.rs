use std::sync::Arc;
use std::time::Duration;

use poem_openapi::{OpenApi, param::Header, payload::Json};

use business::domain::cart::errors::AnalysisError;
use business::domain::cart::model::{CapturedImage, ImageMimeType};
use business::domain::cart::use_cases::analyze::{AnalyzeCartParams, AnalyzeCartUseCase};

use crate::api::cart::dto::{AnalysisResultResponse, AnalyzeCartRequest};
use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::security::ClerkBearer;
use crate::api::tags::ApiTags;

pub struct CartApi {
    analyze_use_case: Arc<dyn AnalyzeCartUseCase>,
    default_api_key: Option<String>,
    timeout: Duration,
}

impl CartApi {
    pub fn new(
        analyze_use_case: Arc<dyn AnalyzeCartUseCase>,
        default_api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            analyze_use_case,
            default_api_key,
            timeout,
        }
    }

    fn decode_image(request: &AnalyzeCartRequest) -> Result<CapturedImage, AnalysisError> {
        let mime_hint = match request.mime_type.as_deref() {
            Some(raw) => Some(
                raw.parse::<ImageMimeType>()
                    .map_err(|_| AnalysisError::InvalidImage)?,
            ),
            None => None,
        };
        CapturedImage::from_base64(&request.image_base64, mime_hint)
    }

    async fn analyze(
        &self,
        image: CapturedImage,
        header_key: Option<String>,
    ) -> Result<AnalysisResultResponse, AnalysisError> {
        let api_key = header_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.default_api_key.clone());

        let call = self
            .analyze_use_case
            .execute(AnalyzeCartParams { image, api_key });

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map(|analysis| analysis.into()),
            Err(_) => {
                tracing::warn!(
                    "Cart analysis timed out after {}s",
                    self.timeout.as_secs()
                );
                Err(AnalysisError::upstream(None, "timed out"))
            }
        }
    }
}

/// Cart recognition API
///
/// Turns a photo of a shopping cart into a priced product list.
#[OpenApi]
impl CartApi {
    /// Analyze a cart photo
    ///
    /// Sends the photo to the vision model and returns the recognized products
    /// with their subtotal. The `X-Gemini-Api-Key` header overrides the
    /// server's configured key. Entries the model reports malformed are dropped.
    #[oai(path = "/cart/analyze", method = "post", tag = "ApiTags::Cart")]
    async fn analyze_cart(
        &self,
        _auth: ClerkBearer,
        #[oai(name = "X-Gemini-Api-Key")] api_key: Header<Option<String>>,
        body: Json<AnalyzeCartRequest>,
    ) -> AnalyzeCartResponse {
        let result = match Self::decode_image(&body.0) {
            Ok(image) => self.analyze(image, api_key.0).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(analysis) => AnalyzeCartResponse::Ok(Json(analysis)),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => AnalyzeCartResponse::BadRequest(json),
                    422 => AnalyzeCartResponse::UnprocessableEntity(json),
                    _ => AnalyzeCartResponse::BadGateway(json),
                }
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum AnalyzeCartResponse {
    #[oai(status = 200)]
    Ok(Json<AnalysisResultResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 422)]
    UnprocessableEntity(Json<ErrorResponse>),
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use business::domain::cart::model::{AnalysisResult, RecognizedProduct};

    struct StubAnalyzer {
        delay: Duration,
    }

    #[async_trait]
    impl AnalyzeCartUseCase for StubAnalyzer {
        async fn execute(
            &self,
            params: AnalyzeCartParams,
        ) -> Result<AnalysisResult, AnalysisError> {
            tokio::time::sleep(self.delay).await;
            match params.api_key.as_deref() {
                Some("good-key") => Ok(AnalysisResult::new(vec![
                    RecognizedProduct::new("Amul Milk", 30, 2, 0.9).unwrap(),
                ])
                .unwrap()),
                _ => Err(AnalysisError::Configuration),
            }
        }
    }

    fn cart_api(default_key: Option<&str>, delay: Duration) -> CartApi {
        CartApi::new(
            Arc::new(StubAnalyzer { delay }),
            default_key.map(|k| k.to_string()),
            Duration::from_millis(200),
        )
    }

    fn image() -> CapturedImage {
        CapturedImage::new(vec![1, 2, 3], ImageMimeType::Jpeg).unwrap()
    }

    #[tokio::test]
    async fn should_use_configured_key_when_header_is_blank() {
        let api = cart_api(Some("good-key"), Duration::ZERO);

        let response = api.analyze(image(), Some("  ".to_string())).await.unwrap();

        assert_eq!(response.subtotal, 60);
    }

    #[tokio::test]
    async fn should_prefer_header_key_over_configured_key() {
        let api = cart_api(Some("stale-key"), Duration::ZERO);

        let response = api.analyze(image(), Some("good-key".to_string())).await;

        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn should_map_timeout_to_upstream_error() {
        let api = cart_api(Some("good-key"), Duration::from_secs(5));

        let result = api.analyze(image(), None).await;

        assert!(matches!(
            result,
            Err(AnalysisError::Upstream { status: None, .. })
        ));
    }

    #[test]
    fn should_reject_unknown_mime_type() {
        let request = AnalyzeCartRequest {
            image_base64: "AQID".to_string(),
            mime_type: Some("image/gif".to_string()),
        };

        let result = CartApi::decode_image(&request);

        assert!(matches!(result, Err(AnalysisError::InvalidImage)));
    }
}
