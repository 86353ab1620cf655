use async_trait::async_trait;

use crate::domain::cart::errors::AnalysisError;
use crate::domain::cart::model::{AnalysisResult, CapturedImage};

pub struct AnalyzeCartParams {
    pub image: CapturedImage,
    /// Credential for the vision model, read once per call.
    pub api_key: Option<String>,
}

#[async_trait]
pub trait AnalyzeCartUseCase: Send + Sync {
    async fn execute(&self, params: AnalyzeCartParams) -> Result<AnalysisResult, AnalysisError>;
}
