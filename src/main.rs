use anyhow::Result;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use carbscope::handlers::AnalysisHandler;
use carbscope::server::create_router;
use carbscope::services::{groq, GroqService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting CarbScope server...");

    let api_key = env::var("GROQ_API_KEY").unwrap_or_default();
    if api_key.trim().is_empty() {
        log::warn!("⚠️ GROQ_API_KEY not set, analysis requests will fail until it is configured");
    }

    let model = env::var("GROQ_MODEL").unwrap_or_else(|_| groq::DEFAULT_MODEL.to_string());

    let estimator = Arc::new(GroqService::new(api_key, model.clone()));
    log::info!("✅ Groq service initialized with model: {}", model);

    let handler = AnalysisHandler::new(estimator);
    let app = create_router(handler);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("🌐 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
