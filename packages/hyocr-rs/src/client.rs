//! OpenAI-compatible `chat/completions` client for grounding OCR models.
use async_trait::async_trait;
use hyocr_core::{OcrEngine, OcrError, OcrOutput, OcrRequest};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::OcrConfig;

const TEMPERATURE: f64 = 0.0;
const TOP_K: u32 = 1;
const REPETITION_PENALTY: f64 = 1.2;
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionsEngine {
    client: reqwest::Client,
    config: OcrConfig,
}

impl ChatCompletionsEngine {
    pub fn new(config: OcrConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }
}

/// Request body: one user turn carrying the image URL and the instruction text.
pub fn build_payload(model: &str, request: &OcrRequest) -> Value {
    json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": request.image_url}},
                    {"type": "text", "text": request.prompt},
                ],
            }
        ],
        "temperature": TEMPERATURE,
        "top_k": TOP_K,
        "repetition_penalty": REPETITION_PENALTY,
        "max_tokens": MAX_TOKENS,
    })
}

/// Pulls `choices[0].message.content`; absent fields give an empty string.
pub fn extract_content(body: &str) -> Result<String, OcrError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| OcrError::MalformedResponse(e.to_string()))?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default())
}

#[async_trait]
impl OcrEngine for ChatCompletionsEngine {
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError> {
        if request.image_url.trim().is_empty() {
            return Err(OcrError::InvalidInput("image_url is required".to_string()));
        }

        let url = self.completions_url();
        tracing::info!(%url, model = %self.config.model, "calling OCR endpoint");

        let response = self
            .client
            .post(&url)
            .json(&build_payload(&self.config.model, request))
            .send()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().or(v["error"].as_str()).map(String::from))
                .unwrap_or(body);
            return Err(OcrError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let raw_text = extract_content(&body)?;
        tracing::debug!(chars = raw_text.chars().count(), "received OCR content");
        Ok(OcrOutput::from_raw_text(raw_text))
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
