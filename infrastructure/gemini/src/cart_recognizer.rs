use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use business::domain::cart::errors::AnalysisError;
use business::domain::cart::services::{RecognitionRequest, VisionModelService};

use crate::client::GeminiClient;

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Cart recognizer backed by Gemini's generateContent endpoint.
pub struct CartRecognizerGemini {
    client: GeminiClient,
}

impl CartRecognizerGemini {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn build_body(request: &RecognitionRequest) -> serde_json::Value {
        json!({
            "contents": [
                {
                    "parts": [
                        {"text": request.instruction},
                        {
                            "inline_data": {
                                "mime_type": request.image.mime_type,
                                "data": request.image.data,
                            }
                        },
                    ]
                }
            ],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_output_tokens,
            },
        })
    }

    /// Turns a raw HTTP reply into the first text block of the first candidate.
    fn read_reply(status: u16, body: &str) -> Result<String, AnalysisError> {
        if !(200..300).contains(&status) {
            return Err(AnalysisError::upstream(
                Some(status),
                format!("Gemini API error: {}", status),
            ));
        }

        let data: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| AnalysisError::upstream(Some(status), format!("undecodable body: {e}")))?;

        data.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .find(|text| !text.trim().is_empty())
            })
            .ok_or_else(|| AnalysisError::upstream(Some(status), "empty response"))
    }
}

#[async_trait]
impl VisionModelService for CartRecognizerGemini {
    async fn generate(
        &self,
        request: &RecognitionRequest,
        api_key: &str,
    ) -> Result<String, AnalysisError> {
        let url = self
            .client
            .generate_content_url(api_key)
            .map_err(|e| AnalysisError::upstream(None, format!("invalid endpoint: {e}")))?;

        let response = self
            .client
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| {
                let status = e.status().map(|s| s.as_u16());
                AnalysisError::upstream(status, e.without_url().to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::upstream(Some(status), e.without_url().to_string()))?;

        Self::read_reply(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::cart::model::{CapturedImage, ImageMimeType};

    fn request() -> RecognitionRequest {
        let image = CapturedImage::new(vec![0xFF, 0xD8, 0xFF], ImageMimeType::Jpeg).unwrap();
        RecognitionRequest::for_cart(&image)
    }

    #[test]
    fn should_build_multipart_body_with_inline_image() {
        let body = CartRecognizerGemini::build_body(&request());

        let parts = &body["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("products"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "/9j/");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert!(body["generationConfig"]["temperature"].as_f64().unwrap() < 0.2);
    }

    #[test]
    fn should_return_first_text_part() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"products\":[]}"},{"text":"ignored"}]}}]}"#;

        let text = CartRecognizerGemini::read_reply(200, body).unwrap();

        assert_eq!(text, r#"{"products":[]}"#);
    }

    #[test]
    fn should_carry_status_when_upstream_fails() {
        let err = CartRecognizerGemini::read_reply(500, "oops").unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream { .. }));
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[test]
    fn should_fail_when_reply_has_no_candidates() {
        let err = CartRecognizerGemini::read_reply(200, r#"{"candidates":[]}"#).unwrap_err();

        match err {
            AnalysisError::Upstream { reason, .. } => assert_eq!(reason, "empty response"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn should_fail_when_candidate_has_no_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inline_data":{}}]}, "finishReason":"SAFETY"}]}"#;

        let err = CartRecognizerGemini::read_reply(200, body).unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream { .. }));
    }

    #[test]
    fn should_fail_when_body_is_not_json() {
        let err = CartRecognizerGemini::read_reply(200, "<html></html>").unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream { .. }));
    }
}
