//! CarbScope estimates the carbohydrate content of a food photograph by
//! sending it to Groq's multimodal chat-completions API and parsing the
//! marker-structured reply.

pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(feature = "web-server")]
pub mod server;

pub use error::AnalysisError;
