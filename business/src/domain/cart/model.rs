use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::errors::{AnalysisError, EntryRejection};

/// Encoding of a captured cart photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMimeType {
    #[default]
    Jpeg,
    Png,
    Webp,
    Heic,
    Heif,
}

impl ImageMimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMimeType::Jpeg => "image/jpeg",
            ImageMimeType::Png => "image/png",
            ImageMimeType::Webp => "image/webp",
            ImageMimeType::Heic => "image/heic",
            ImageMimeType::Heif => "image/heif",
        }
    }
}

impl std::fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ImageMimeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let subtype = s.trim().to_lowercase();
        let subtype = subtype.strip_prefix("image/").unwrap_or(&subtype);
        match subtype {
            "jpeg" | "jpg" => Ok(ImageMimeType::Jpeg),
            "png" => Ok(ImageMimeType::Png),
            "webp" => Ok(ImageMimeType::Webp),
            "heic" => Ok(ImageMimeType::Heic),
            "heif" => Ok(ImageMimeType::Heif),
            _ => Err(format!("Invalid image mime type: {}", s)),
        }
    }
}

/// One photo of a cart, taken with the camera or picked from a file.
///
/// Lives only as long as the request that carries it. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
    mime_type: ImageMimeType,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>, mime_type: ImageMimeType) -> Result<Self, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::InvalidImage);
        }
        Ok(Self { bytes, mime_type })
    }

    /// Decodes a base64 payload as sent by the browser.
    ///
    /// Accepts either bare base64 or a `data:image/<type>;base64,` URL. When a
    /// data URL is given its MIME type wins over `mime_hint`.
    pub fn from_base64(raw: &str, mime_hint: Option<ImageMimeType>) -> Result<Self, AnalysisError> {
        let data_url = regex::Regex::new(r"^\s*data:(image/[A-Za-z0-9.+-]+);base64,")
            .map_err(|_| AnalysisError::InvalidImage)?;

        let (payload, url_mime) = match data_url.captures(raw) {
            Some(caps) => {
                let prefix_len = caps.get(0).map(|m| m.end()).unwrap_or(0);
                let mime = caps.get(1).and_then(|m| m.as_str().parse().ok());
                (&raw[prefix_len..], mime)
            }
            None => (raw, None),
        };

        let clean: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(clean.as_bytes())
            .map_err(|_| AnalysisError::InvalidImage)?;

        let mime_type = url_mime.or(mime_hint).unwrap_or_default();
        Self::new(bytes, mime_type)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> ImageMimeType {
        self.mime_type
    }

    /// Base64 (standard alphabet, padded) for inline transport in a JSON body.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// A product the vision model believes is in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedProduct {
    name: String,
    unit_price: u64,
    quantity: u32,
    confidence: f64,
}

impl RecognizedProduct {
    pub fn new(
        name: &str,
        unit_price: u64,
        quantity: u32,
        confidence: f64,
    ) -> Result<Self, EntryRejection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EntryRejection::MissingName);
        }
        if quantity == 0 {
            return Err(EntryRejection::InvalidQuantity);
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(EntryRejection::InvalidConfidence);
        }
        if unit_price.checked_mul(u64::from(quantity)).is_none() {
            return Err(EntryRejection::InvalidPrice);
        }

        Ok(Self {
            name: name.to_string(),
            unit_price,
            quantity,
            confidence,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whole rupees.
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Cannot overflow: [`RecognizedProduct::new`] rejects such prices.
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Products recognized in one capture, with their subtotal before tax.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    products: Vec<RecognizedProduct>,
    subtotal: u64,
}

impl AnalysisResult {
    /// `None` when the line totals do not fit in a `u64`.
    pub fn new(products: Vec<RecognizedProduct>) -> Option<Self> {
        let subtotal = products
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.line_total()))?;
        Some(Self { products, subtotal })
    }

    pub fn products(&self) -> &[RecognizedProduct] {
        &self.products
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    pub fn into_products(self) -> Vec<RecognizedProduct> {
        self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn should_reject_empty_image() {
        let result = CapturedImage::new(vec![], ImageMimeType::Jpeg);
        assert!(matches!(result, Err(AnalysisError::InvalidImage)));
    }

    #[test]
    fn should_decode_data_url_and_take_its_mime_type() {
        let image =
            CapturedImage::from_base64("data:image/png;base64,AQID", Some(ImageMimeType::Jpeg))
                .unwrap();

        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.mime_type(), ImageMimeType::Png);
    }

    #[test]
    fn should_decode_bare_base64_with_whitespace() {
        let image = CapturedImage::from_base64("AQ\nID ", None).unwrap();

        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.mime_type(), ImageMimeType::Jpeg);
    }

    #[test]
    fn should_reject_payload_that_is_not_base64() {
        let result = CapturedImage::from_base64("not base64 at all!", None);
        assert!(matches!(result, Err(AnalysisError::InvalidImage)));
    }

    #[test]
    fn should_reject_data_url_without_payload() {
        let result = CapturedImage::from_base64("data:image/jpeg;base64,", None);
        assert!(matches!(result, Err(AnalysisError::InvalidImage)));
    }

    #[test]
    fn should_parse_mime_types_with_or_without_prefix() {
        assert_eq!("image/jpg".parse::<ImageMimeType>(), Ok(ImageMimeType::Jpeg));
        assert_eq!("WEBP".parse::<ImageMimeType>(), Ok(ImageMimeType::Webp));
        assert!("image/gif".parse::<ImageMimeType>().is_err());
    }

    #[test]
    fn should_trim_product_name() {
        let product = RecognizedProduct::new("  Maggi Noodles ", 25, 2, 0.9).unwrap();
        assert_eq!(product.name(), "Maggi Noodles");
        assert_eq!(product.line_total(), 50);
    }

    #[test]
    fn should_reject_invalid_product_fields() {
        assert_eq!(
            RecognizedProduct::new(" ", 10, 1, 0.5),
            Err(EntryRejection::MissingName)
        );
        assert_eq!(
            RecognizedProduct::new("Milk", 10, 0, 0.5),
            Err(EntryRejection::InvalidQuantity)
        );
        assert_eq!(
            RecognizedProduct::new("Milk", 10, 1, 1.5),
            Err(EntryRejection::InvalidConfidence)
        );
        assert_eq!(
            RecognizedProduct::new("Milk", u64::MAX, 2, 0.5),
            Err(EntryRejection::InvalidPrice)
        );
    }

    #[test]
    fn should_have_zero_subtotal_for_empty_cart() {
        let result = AnalysisResult::new(vec![]).unwrap();
        assert_eq!(result.subtotal(), 0);
    }

    #[test]
    fn should_refuse_result_whose_subtotal_overflows() {
        let products = vec![
            RecognizedProduct::new("Gold Bar", u64::MAX, 1, 0.9).unwrap(),
            RecognizedProduct::new("Milk", 10, 1, 0.9).unwrap(),
        ];

        assert_eq!(AnalysisResult::new(products), None);
    }

    proptest! {
        #[test]
        fn base64_transport_preserves_image_bytes(bytes in proptest::collection::vec(any::<u8>(), 1..2048)) {
            let image = CapturedImage::new(bytes.clone(), ImageMimeType::Jpeg).unwrap();
            let decoded = STANDARD.decode(image.to_base64()).unwrap();
            prop_assert_eq!(decoded, bytes);
        }

        #[test]
        fn subtotal_is_sum_of_line_totals(
            lines in proptest::collection::vec((0u64..100_000, 1u32..50), 0..30)
        ) {
            let products: Vec<RecognizedProduct> = lines
                .iter()
                .map(|(price, qty)| RecognizedProduct::new("Item", *price, *qty, 0.5).unwrap())
                .collect();
            let expected: u64 = lines.iter().map(|(p, q)| p * u64::from(*q)).sum();

            let result = AnalysisResult::new(products).unwrap();

            prop_assert_eq!(result.subtotal(), expected);
        }
    }
}
