use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::{CarbAnalysis, ImageSource};
use crate::services::image::to_data_url;
use crate::services::CarbEstimator;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

const SUMMARY_MARKER: &str = "[SUMMARY]";
const DETAIL_MARKER: &str = "[DETAILED ANALYSIS]";

/// Prompt instructing the model to answer in two marker-delimited sections:
/// a bare integer total first, then the structured analysis.
const ANALYSIS_PROMPT: &str = "\
You are analyzing a food image. Please respond using two clear sections:\n\
\n\
[SUMMARY]\n\
<just the total carbohydrate estimate in grams, number only, no units, no text - e.g., 13 OR 100>\n\
\n\
[DETAILED ANALYSIS]\n\
\n\
1. **Identified Food Items**: List and describe each food item visible in the image.\n\
2. **Carbohydrate Estimate per Item**: Provide estimates (in grams) for each food item.\n\
3. **Serving Sizes**: Indicate the assumed serving size for each item.\n\
4. **Estimation Basis**: Explain how these estimates were derived.\n\
5. **Total Carbohydrates**: Restate the total with units and a short human-readable summary.\n\
\n\
If you cannot identify the food or estimate carbs with reasonable confidence, please state this clearly.";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData,
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_completion_tokens: u32,
    top_p: f64,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

/// Groq chat-completions client for food image analysis.
pub struct GroqService {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqService {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    /// Same as `new` but pointed at a different endpoint.
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Pair the fixed prompt with one image reference. Pure construction;
    /// image content is not validated here.
    fn build_request(&self, image: &ImageSource) -> ChatRequest {
        let url = match image {
            ImageSource::Url(url) => url.clone(),
            ImageSource::Inline { data, mime } => to_data_url(data, mime),
        };

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        content_type: "text".to_string(),
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        content_type: "image_url".to_string(),
                        image_url: ImageData { url },
                    },
                ],
            }],
            // low temperature for more factual responses
            temperature: 0.2,
            max_completion_tokens: 1024,
            top_p: 1.0,
            stream: false,
            stop: None,
        }
    }

    /// Send one analysis request and return the raw reply text.
    ///
    /// An empty credential fails before any network I/O is attempted.
    pub async fn estimate_raw(&self, image: &ImageSource) -> Result<String, AnalysisError> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }

        let request = self.build_request(image);
        log::info!("🤖 Sending request to Groq with model: {}", self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Groq response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error")?.get("message")?.as_str().map(String::from))
                .unwrap_or(body);
            log::error!("❌ Groq API error ({}): {}", status, message);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        log::info!("💬 Groq reply received ({} chars)", content.len());
        Ok(content)
    }
}

#[async_trait::async_trait]
impl CarbEstimator for GroqService {
    async fn estimate(&self, image: &ImageSource) -> Result<CarbAnalysis, AnalysisError> {
        let raw = self.estimate_raw(image).await?;
        Ok(parse_analysis(&raw))
    }
}

static SUMMARY_NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)").unwrap());
static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[SUMMARY\].*?\[DETAILED ANALYSIS\]").unwrap());

/// Split a model reply into the integer total and the descriptive text.
///
/// A reply without a usable `[SUMMARY]` section comes back verbatim with no
/// total. Callers surface that as "could not extract a total" while still
/// showing the detail text; it is never an error.
pub fn parse_analysis(text: &str) -> CarbAnalysis {
    let raw = text.to_string();

    let summary_pos = match text.find(SUMMARY_MARKER) {
        Some(pos) => pos,
        None => {
            return CarbAnalysis {
                total_g: None,
                details: raw.clone(),
                raw,
            }
        }
    };

    // A detail marker ahead of the summary marker means the model scrambled
    // the sections; degrade instead of guessing.
    if let Some(detail_pos) = text.find(DETAIL_MARKER) {
        if detail_pos < summary_pos {
            return CarbAnalysis {
                total_g: None,
                details: raw.clone(),
                raw,
            };
        }
    }

    // Only the first digit run directly after the first marker counts.
    let after_marker = &text[summary_pos + SUMMARY_MARKER.len()..];
    let total_g = SUMMARY_NUM_RE
        .captures(after_marker)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    if total_g.is_none() {
        return CarbAnalysis {
            total_g: None,
            details: raw.clone(),
            raw,
        };
    }

    // Drop everything from [SUMMARY] through the next [DETAILED ANALYSIS]
    // marker; without one, drop through to the end of the text.
    let details = if SECTION_RE.is_match(text) {
        SECTION_RE.replace(text, "").into_owned()
    } else {
        text[..summary_pos].to_string()
    };

    let details = details.trim_start();
    let details = details
        .strip_prefix(DETAIL_MARKER)
        .map(str::trim_start)
        .unwrap_or(details);

    CarbAnalysis {
        total_g,
        details: details.trim_end().to_string(),
        raw,
    }
}
