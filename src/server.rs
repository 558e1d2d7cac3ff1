use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::handlers::AnalysisHandler;
use crate::models::CarbAnalysis;
use crate::services::image::mime_from_path;

pub struct AppState {
    pub handler: AnalysisHandler,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnalyseRequest {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyseResponse {
    /// Total carbohydrate estimate in grams; null when no usable summary
    /// section was found in the reply.
    pub summary: Option<u32>,
    pub details: String,
    /// Full unparsed reply, suitable for a plain-text download.
    pub raw: String,
}

impl From<CarbAnalysis> for AnalyseResponse {
    fn from(analysis: CarbAnalysis) -> Self {
        Self {
            summary: analysis.total_g,
            details: analysis.details,
            raw: analysis.raw,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn create_router(handler: AnalysisHandler) -> Router {
    let state = Arc::new(AppState { handler });

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/analyse", post(analyse_handler))
        .route("/analyse/upload", post(upload_handler))
        .with_state(state)
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn analysis_error(err: AnalysisError) -> ApiError {
    let status = match &err {
        AnalysisError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::ImageLoad(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Api { .. } | AnalysisError::Http(_) | AnalysisError::Json(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    log::error!("❌ Analysis failed: {}", err);
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

fn respond(analysis: CarbAnalysis) -> Json<AnalyseResponse> {
    if analysis.total_g.is_none() {
        log::warn!("⚠️ Could not extract a total from the reply");
    }
    Json(analysis.into())
}

async fn analyse_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyseRequest>,
) -> Result<Json<AnalyseResponse>, ApiError> {
    if request.image_url.trim().is_empty() {
        return Err(bad_request("Missing imageUrl"));
    }

    log::info!("📸 Analysing image from URL: {}", request.image_url);

    state
        .handler
        .analyze_fetched(&request.image_url)
        .await
        .map(respond)
        .map_err(analysis_error)
}

async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyseResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let mime = field
            .content_type()
            .filter(|m| m.starts_with("image/"))
            .map(String::from)
            .unwrap_or_else(|| {
                field
                    .file_name()
                    .map(mime_from_path)
                    .unwrap_or("image/jpeg")
                    .to_string()
            });

        let data = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("failed to read upload: {}", e)))?
            .to_vec();

        log::info!("📸 Analysing uploaded image ({} bytes, {})", data.len(), mime);

        return state
            .handler
            .analyze_bytes(data, mime)
            .await
            .map(respond)
            .map_err(analysis_error);
    }

    Err(bad_request("Missing image field"))
}

async fn root_handler() -> &'static str {
    "CarbScope - Carbohydrate Estimator. POST a food image URL to /analyse."
}

async fn health_check() -> &'static str {
    "OK"
}
