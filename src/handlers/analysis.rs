use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{CarbAnalysis, ImageSource};
use crate::services::{CarbEstimator, ImageService};

/// Glue between an image source and the estimator. One request per call;
/// no state is kept across calls.
pub struct AnalysisHandler {
    estimator: Arc<dyn CarbEstimator>,
    images: ImageService,
}

impl AnalysisHandler {
    pub fn new(estimator: Arc<dyn CarbEstimator>) -> Self {
        Self {
            estimator,
            images: ImageService::new(),
        }
    }

    /// Analyze an image the model can reach itself, passing the URL by
    /// reference.
    pub async fn analyze_url(&self, url: &str) -> Result<CarbAnalysis, AnalysisError> {
        self.estimator
            .estimate(&ImageSource::Url(url.to_string()))
            .await
    }

    /// Download the image first and send it inlined.
    pub async fn analyze_fetched(&self, url: &str) -> Result<CarbAnalysis, AnalysisError> {
        let (data, mime) = self.images.fetch_url(url).await?;
        self.estimator
            .estimate(&ImageSource::Inline { data, mime })
            .await
    }

    /// Analyze a local jpeg/png file.
    pub async fn analyze_file(&self, path: &str) -> Result<CarbAnalysis, AnalysisError> {
        let (data, mime) = self.images.load_file(path)?;
        self.estimator
            .estimate(&ImageSource::Inline { data, mime })
            .await
    }

    /// Analyze image bytes the caller already holds (upload path).
    pub async fn analyze_bytes(
        &self,
        data: Vec<u8>,
        mime: String,
    ) -> Result<CarbAnalysis, AnalysisError> {
        self.estimator
            .estimate(&ImageSource::Inline { data, mime })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::groq::parse_analysis;
    use std::sync::Mutex;

    /// Estimator that replies with a fixed text and records the image
    /// variant it was given.
    struct CannedEstimator {
        reply: String,
        seen: Mutex<Vec<String>>,
    }

    impl CannedEstimator {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CarbEstimator for CannedEstimator {
        async fn estimate(&self, image: &ImageSource) -> Result<CarbAnalysis, AnalysisError> {
            let variant = match image {
                ImageSource::Url(_) => "url".to_string(),
                ImageSource::Inline { .. } => "inline".to_string(),
            };
            self.seen.lock().unwrap().push(variant);
            Ok(parse_analysis(&self.reply))
        }
    }

    #[tokio::test]
    async fn test_analyze_url_passes_reference() {
        let estimator = Arc::new(CannedEstimator::new(
            "[SUMMARY]\n42\n[DETAILED ANALYSIS]\nRice.",
        ));
        let handler = AnalysisHandler::new(estimator.clone());

        let analysis = handler
            .analyze_url("https://example.com/dish.jpg")
            .await
            .unwrap();

        assert_eq!(analysis.total_g, Some(42));
        assert_eq!(analysis.details, "Rice.");
        assert_eq!(estimator.seen.lock().unwrap().as_slice(), ["url"]);
    }

    #[tokio::test]
    async fn test_analyze_bytes_inlines() {
        let estimator = Arc::new(CannedEstimator::new("No food visible."));
        let handler = AnalysisHandler::new(estimator.clone());

        let analysis = handler
            .analyze_bytes(vec![1, 2, 3], "image/png".to_string())
            .await
            .unwrap();

        assert_eq!(analysis.total_g, None);
        assert_eq!(analysis.details, "No food visible.");
        assert_eq!(estimator.seen.lock().unwrap().as_slice(), ["inline"]);
    }
}
