use base64::{engine::general_purpose, Engine};
use std::fs;

use crate::error::AnalysisError;

/// Guess the MIME type from a file name or URL path extension.
pub fn mime_from_path(path: &str) -> &'static str {
    if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "image/jpeg" // default
    }
}

/// Encode raw image bytes as a data URL for inlining into a request payload.
pub fn to_data_url(data: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(data))
}

/// Loads image bytes from the two supported sources: a user-supplied HTTP
/// URL or a local jpeg/png file.
pub struct ImageService {
    client: reqwest::Client,
}

impl ImageService {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Download image bytes from a URL. Returns the bytes together with the
    /// MIME type reported by the server (extension-based fallback).
    pub async fn fetch_url(&self, url: &str) -> Result<(Vec<u8>, String), AnalysisError> {
        log::debug!("🌐 Fetching image from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AnalysisError::ImageLoad(format!("fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AnalysisError::ImageLoad(format!(
                "fetch failed with status {}",
                response.status()
            )));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| mime_from_path(url).to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AnalysisError::ImageLoad(format!("read failed: {}", e)))?;

        log::debug!("📊 Fetched {} bytes ({})", bytes.len(), mime);
        Ok((bytes.to_vec(), mime))
    }

    /// Read a local jpeg/png file.
    pub fn load_file(&self, path: &str) -> Result<(Vec<u8>, String), AnalysisError> {
        let data =
            fs::read(path).map_err(|e| AnalysisError::ImageLoad(format!("{}: {}", path, e)))?;
        let mime = mime_from_path(path).to_string();

        log::debug!("📁 Loaded {} ({} bytes, {})", path, data.len(), mime);
        Ok((data, mime))
    }
}

impl Default for ImageService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path("meal.png"), "image/png");
        assert_eq!(mime_from_path("meal.jpg"), "image/jpeg");
        assert_eq!(mime_from_path("meal.jpeg"), "image/jpeg");
        // unknown extensions fall back to jpeg
        assert_eq!(mime_from_path("meal.webp"), "image/jpeg");
        assert_eq!(mime_from_path("https://example.com/dish.png"), "image/png");
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(&[1, 2, 3], "image/png");
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_data_url_round_trip() {
        let original: Vec<u8> = (0..=255).collect();
        let url = to_data_url(&original, "image/jpeg");

        let encoded = url.split("base64,").nth(1).unwrap();
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_load_file_missing() {
        let service = ImageService::new();
        let err = service.load_file("/no/such/meal.png").unwrap_err();
        assert!(matches!(err, AnalysisError::ImageLoad(_)));
    }
}
