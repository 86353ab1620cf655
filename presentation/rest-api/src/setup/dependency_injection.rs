use std::sync::Arc;

use logger::TracingLogger;

use gemini::cart_recognizer::CartRecognizerGemini;
use gemini::client::GeminiClient;

use business::application::cart::analyze::AnalyzeCartUseCaseImpl;
use business::application::checkout::process::CheckoutUseCaseImpl;

use crate::api::cart::routes::CartApi;
use crate::api::checkout::routes::CheckoutApi;
use crate::api::health::routes::HealthApi;
use crate::config::gemini_config::GeminiConfig;

pub struct DependencyContainer {
    pub health_api: HealthApi,
    pub cart_api: CartApi,
    pub checkout_api: CheckoutApi,
}

impl DependencyContainer {
    pub fn new(gemini_config: &GeminiConfig) -> Self {
        let analyzer_logger = Arc::new(TracingLogger::new("cart-analyzer"));
        let checkout_logger = Arc::new(TracingLogger::new("checkout"));

        // Infrastructure adapters
        let gemini_client = GeminiClient::new(&gemini_config.base_url, &gemini_config.model);
        let cart_recognizer = Arc::new(CartRecognizerGemini::new(gemini_client));

        // Use cases
        let analyze_use_case = Arc::new(AnalyzeCartUseCaseImpl {
            model: cart_recognizer,
            logger: analyzer_logger,
        });
        let checkout_use_case = Arc::new(CheckoutUseCaseImpl {
            logger: checkout_logger,
        });

        Self {
            health_api: HealthApi::new(gemini_config.api_key.is_some()),
            cart_api: CartApi::new(
                analyze_use_case,
                gemini_config.api_key.clone(),
                gemini_config.timeout,
            ),
            checkout_api: CheckoutApi::new(checkout_use_case),
        }
    }
}
