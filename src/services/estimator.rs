use crate::error::AnalysisError;
use crate::models::{CarbAnalysis, ImageSource};

/// Trait for carbohydrate estimation backends (Groq today).
#[async_trait::async_trait]
pub trait CarbEstimator: Send + Sync {
    /// Run one analysis request and return the parsed reply.
    async fn estimate(&self, image: &ImageSource) -> Result<CarbAnalysis, AnalysisError>;
}
