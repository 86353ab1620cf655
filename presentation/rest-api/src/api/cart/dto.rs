use poem_openapi::Object;

use business::domain::cart::model::{AnalysisResult, RecognizedProduct};

#[derive(Debug, Clone, Object)]
pub struct AnalyzeCartRequest {
    /// Base64-encoded cart photo, bare or as a `data:image/...;base64,` URL
    pub image_base64: String,
    /// MIME type of the photo when sent as bare base64 (default: image/jpeg)
    #[oai(skip_serializing_if_is_none)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Object)]
pub struct RecognizedProductResponse {
    /// Product name
    pub name: String,
    /// Unit price in whole rupees
    pub unit_price: u64,
    /// Number of units seen in the cart
    pub quantity: u32,
    /// Model confidence between 0 and 1
    pub confidence: f64,
    /// `unitPrice * quantity`
    pub line_total: u64,
}

impl From<&RecognizedProduct> for RecognizedProductResponse {
    fn from(product: &RecognizedProduct) -> Self {
        Self {
            name: product.name().to_string(),
            unit_price: product.unit_price(),
            quantity: product.quantity(),
            confidence: product.confidence(),
            line_total: product.line_total(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct AnalysisResultResponse {
    /// Recognized products, in the order the model listed them
    pub products: Vec<RecognizedProductResponse>,
    /// Sum of line totals before tax
    pub subtotal: u64,
}

impl From<AnalysisResult> for AnalysisResultResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            products: result.products().iter().map(|p| p.into()).collect(),
            subtotal: result.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_analysis_result_with_line_totals() {
        let result = AnalysisResult::new(vec![
            RecognizedProduct::new("Maggi Noodles", 25, 4, 0.93).unwrap(),
        ])
        .unwrap();

        let response: AnalysisResultResponse = result.into();

        assert_eq!(response.subtotal, 100);
        assert_eq!(response.products[0].line_total, 100);
        assert_eq!(response.products[0].unit_price, 25);
    }
}
