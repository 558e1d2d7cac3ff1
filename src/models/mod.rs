use serde::{Deserialize, Serialize};

/// The image being analyzed. Exactly one variant per request; constructed
/// fresh for every user action and discarded once the request completes.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Publicly reachable image URL, sent to the model by reference.
    Url(String),
    /// Raw image bytes, inlined as a base64 data URL before transmission.
    Inline { data: Vec<u8>, mime: String },
}

/// The model's reply after marker extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbAnalysis {
    /// Total carbohydrate estimate in grams. `None` when the reply carried
    /// no usable summary section - a degraded display case, not an error.
    pub total_g: Option<u32>,
    /// Descriptive analysis with the summary section stripped out.
    pub details: String,
    /// Full unparsed reply, kept for the downloadable plain-text artifact.
    pub raw: String,
}
