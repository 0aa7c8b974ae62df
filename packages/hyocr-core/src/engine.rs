use async_trait::async_trait;
use thiserror::Error;

use crate::block::TextBlock;
use crate::parser::ParsedContent;

#[derive(Debug, Clone)]
pub struct OcrRequest {
    pub image_url: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct OcrOutput {
    pub raw_text: String,
    pub blocks: Vec<TextBlock>,
}

impl OcrOutput {
    pub fn from_raw_text(raw_text: impl Into<String>) -> Self {
        let ParsedContent { raw, blocks } = ParsedContent::parse(raw_text);
        Self {
            raw_text: raw,
            blocks,
        }
    }
}

impl From<OcrOutput> for ParsedContent {
    fn from(output: OcrOutput) -> Self {
        Self {
            raw: output.raw_text,
            blocks: output.blocks,
        }
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A service that turns an image into coordinate-annotated text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError>;

    /// Where requests go, for reporting.
    fn endpoint(&self) -> &str;

    fn model(&self) -> &str;
}
