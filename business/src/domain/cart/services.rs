use async_trait::async_trait;

use super::errors::AnalysisError;
use super::model::CapturedImage;

const CART_INSTRUCTION: &str = r#"You are the checkout assistant of an Indian retail store.
Look at this photo of a shopping cart and list every retail product you can clearly see.
For each product give:
- "name": the product name, with the brand when it is readable
- "price": the estimated unit price in Indian Rupees, as a whole number
- "quantity": how many units of that product are visible (1 if unsure)
- "confidence": how sure you are about the product, between 0 and 1

Leave out anything you cannot identify with reasonable certainty.
Reply with ONLY a JSON object of this shape and no other text:
{"products":[{"name":"Maggi Noodles","price":25,"quantity":2,"confidence":0.93}]}"#;

/// Sampling temperature kept low so the model answers with literal JSON.
pub const RECOGNITION_TEMPERATURE: f32 = 0.1;
pub const RECOGNITION_MAX_OUTPUT_TOKENS: u32 = 1000;

/// Image sent inline with the request.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64 with padding.
    pub data: String,
}

/// A provider-neutral multimodal recognition request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionRequest {
    pub instruction: String,
    pub image: InlineImage,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl RecognitionRequest {
    /// Builds the request asking the model to enumerate the products in a cart photo.
    pub fn for_cart(image: &CapturedImage) -> Self {
        Self {
            instruction: CART_INSTRUCTION.to_string(),
            image: InlineImage {
                mime_type: image.mime_type().to_string(),
                data: image.to_base64(),
            },
            temperature: RECOGNITION_TEMPERATURE,
            max_output_tokens: RECOGNITION_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Service port for the hosted vision model.
///
/// Returns the first textual block of the model reply. Implementations map
/// transport problems, non-success statuses and empty replies to
/// [`AnalysisError::Upstream`].
#[async_trait]
pub trait VisionModelService: Send + Sync {
    async fn generate(
        &self,
        request: &RecognitionRequest,
        api_key: &str,
    ) -> Result<String, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::model::ImageMimeType;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn should_embed_image_as_base64_with_its_mime_type() {
        // Arrange
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let image = CapturedImage::new(bytes.clone(), ImageMimeType::Jpeg).unwrap();

        // Act
        let request = RecognitionRequest::for_cart(&image);

        // Assert
        assert_eq!(request.image.mime_type, "image/jpeg");
        assert_eq!(STANDARD.decode(&request.image.data).unwrap(), bytes);
    }

    #[test]
    fn should_use_low_temperature_and_output_cap() {
        let image = CapturedImage::new(vec![1], ImageMimeType::Png).unwrap();

        let request = RecognitionRequest::for_cart(&image);

        assert!(request.temperature <= 0.2);
        assert_eq!(request.max_output_tokens, 1000);
        assert!(request.instruction.contains("\"products\""));
        assert!(request.instruction.contains("ONLY a JSON object"));
    }
}
