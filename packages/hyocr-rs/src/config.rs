//! Service configuration, resolved from CLI flags with `HY_OCR_*` environment fallbacks.
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1";
pub const DEFAULT_MODEL: &str = "/app/models/HunyuanOCR";
pub const DEFAULT_PROMPT: &str =
    "Detect and recognize text in the image, and output the text coordinates in a formatted manner.";
pub const DEFAULT_SAMPLE_IMAGE: &str = "https://ev-cuhk.net/tmp/t01.jpg";

pub const ENV_ENDPOINT: &str = "HY_OCR_ENDPOINT";
pub const ENV_MODEL: &str = "HY_OCR_MODEL";
pub const ENV_PROMPT: &str = "HY_OCR_PROMPT";
pub const ENV_SAMPLE_IMAGE: &str = "HY_OCR_SAMPLE_IMAGE";

/// Connection settings for the OCR service.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub model: String,
    pub prompt: String,
    pub sample_image_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Timeout for the bounded image header read.
    pub fetch_timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            sample_image_url: DEFAULT_SAMPLE_IMAGE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl OcrConfig {
    /// Defaults overridden by any `HY_OCR_*` variables that are set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_value(ENV_ENDPOINT) {
            config.endpoint = v;
        }
        if let Some(v) = env_value(ENV_MODEL) {
            config.model = v;
        }
        if let Some(v) = env_value(ENV_PROMPT) {
            config.prompt = v;
        }
        if let Some(v) = env_value(ENV_SAMPLE_IMAGE) {
            config.sample_image_url = v;
        }
        config
    }

    /// Endpoint with any trailing slash removed, ready for path joins.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
