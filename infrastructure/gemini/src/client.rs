use reqwest::Client;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Shared Gemini HTTP client configuration.
///
/// No request timeout is set here; callers race the call against their own timer.
pub struct GeminiClient {
    pub client: Client,
    pub base_url: String,
    pub model: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Returns the generateContent endpoint with the key in the query string.
    pub fn generate_content_url(&self, api_key: &str) -> Result<Url, url::ParseError> {
        let endpoint = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&endpoint, &[("key", api_key)])
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }
}
