use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cart::errors::AnalysisError;
use crate::domain::cart::extraction::parse_reply;
use crate::domain::cart::model::AnalysisResult;
use crate::domain::cart::services::{RecognitionRequest, VisionModelService};
use crate::domain::cart::use_cases::analyze::{AnalyzeCartParams, AnalyzeCartUseCase};
use crate::domain::logger::Logger;

pub struct AnalyzeCartUseCaseImpl {
    pub model: Arc<dyn VisionModelService>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl AnalyzeCartUseCase for AnalyzeCartUseCaseImpl {
    async fn execute(&self, params: AnalyzeCartParams) -> Result<AnalysisResult, AnalysisError> {
        let api_key = match params.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                self.logger
                    .error("Cart analysis aborted: vision model API key is not configured");
                return Err(AnalysisError::Configuration);
            }
        };

        self.logger.info(&format!(
            "Analyzing cart image ({} bytes, {})",
            params.image.bytes().len(),
            params.image.mime_type()
        ));

        let request = RecognitionRequest::for_cart(&params.image);

        let text = match self.model.generate(&request, api_key).await {
            Ok(text) => text,
            Err(err) => {
                if let AnalysisError::Upstream { status, reason } = &err {
                    self.logger.error(&format!(
                        "Vision model request failed (status: {:?}): {}",
                        status, reason
                    ));
                }
                return Err(err);
            }
        };

        let reply = parse_reply(&text).inspect_err(|_| {
            self.logger
                .warn("Vision model reply did not contain a usable JSON object");
            self.logger.debug(&format!("Unparseable reply: {}", text));
        })?;

        for rejected in &reply.rejected {
            self.logger.warn(&format!(
                "Dropped product entry #{}: {}",
                rejected.index, rejected.reason
            ));
        }

        let result =
            AnalysisResult::new(reply.products).ok_or(AnalysisError::MalformedResponse)?;

        self.logger.info(&format!(
            "Cart analyzed: {} products, subtotal {}",
            result.products().len(),
            result.subtotal()
        ));

        Ok(result)
    }
}
