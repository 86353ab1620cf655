use chrono::Utc;
use poem_openapi::{Object, OpenApi, payload::Json};

use crate::api::tags::ApiTags;

/// Health check response
#[derive(Debug, Clone, Object)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
    /// Whether a default vision model API key is configured
    pub vision_model_configured: bool,
}

/// Health API for liveness probes and client bootstrapping.
pub struct HealthApi {
    vision_model_configured: bool,
}

impl HealthApi {
    pub fn new(vision_model_configured: bool) -> Self {
        Self {
            vision_model_configured,
        }
    }
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Public, no authentication. `visionModelConfigured` tells the web client
    /// whether it has to ask the user for a Gemini API key.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vision_model_configured: self.vision_model_configured,
        })
    }
}
