/// Fatal outcomes of a cart analysis.
/// Display strings are code-style identifiers for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis.configuration")]
    Configuration,
    #[error("analysis.invalid_image")]
    InvalidImage,
    #[error("analysis.upstream")]
    Upstream { status: Option<u16>, reason: String },
    #[error("analysis.malformed_response")]
    MalformedResponse,
}

impl AnalysisError {
    pub fn upstream(status: Option<u16>, reason: impl Into<String>) -> Self {
        AnalysisError::Upstream {
            status,
            reason: reason.into(),
        }
    }

    /// Status code returned by the recognition service, when there was one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AnalysisError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

/// Why a single product entry in the model reply was dropped.
///
/// Never fails the analysis as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryRejection {
    #[error("entry.not_an_object")]
    NotAnObject,
    #[error("entry.missing_name")]
    MissingName,
    #[error("entry.invalid_price")]
    InvalidPrice,
    #[error("entry.invalid_quantity")]
    InvalidQuantity,
    #[error("entry.invalid_confidence")]
    InvalidConfidence,
}
