use std::env;
use std::time::Duration;

use gemini::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Gemini vision model.
///
/// Environment variables:
/// - GEMINI_API_KEY: default credential (optional, a request header may supply one)
/// - GEMINI_BASE_URL: API base URL (default: public v1beta endpoint)
/// - GEMINI_MODEL: model name (default: "gemini-1.5-flash")
/// - GEMINI_TIMEOUT_SECS: how long a request may wait for the model (default: 30)
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = parse_timeout(env::var("GEMINI_TIMEOUT_SECS").ok().as_deref());

        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; requests must send X-Gemini-Api-Key");
        }

        Self {
            api_key,
            base_url,
            model,
            timeout,
        }
    }
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
