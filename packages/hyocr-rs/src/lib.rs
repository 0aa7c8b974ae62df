//! # hyocr-rs
//!
//! Client-side tooling for grounding OCR services that answer with
//! `label(x1,y1),(x2,y2)` text in a `[0, 1000]` normalized space.
//!
//! - **Service client**: [`ChatCompletionsEngine`] talks to an OpenAI-compatible
//!   `chat/completions` endpoint
//! - **Analysis**: [`analyze`] parses the response, resolves the image size and
//!   attaches pixel boxes, degrading to normalized-only output when it cannot
//! - **Bounded fetch**: image headers are read from URLs or files, never more than
//!   [`hyocr_core::MAX_SNIFF_BYTES`]
//! - **Settings and keep-alive** helpers used by the `hyocr` binary
//!
//! ```ignore
//! use hyocr_rs::prelude::*;
//!
//! let engine = ChatCompletionsEngine::new(OcrConfig::from_env())?;
//! let request = OcrRequest { image_url: url, prompt: DEFAULT_PROMPT.into() };
//! let analysis = analyze(&engine, &request, None, Duration::from_secs(10)).await?;
//! println!("{}", analysis.render_text());
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod fetch;
pub mod keepalive;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use analysis::{analyze, resolve_hint, Analysis, BlockReport, DimensionHint, COLOR_PALETTE};
pub use client::ChatCompletionsEngine;
pub use config::{OcrConfig, DEFAULT_PROMPT};
pub use fetch::{fetch_header, probe_dimensions, FetchError, ImageSource};
pub use keepalive::KeepAliveSummary;
pub use settings::Settings;

/// Prelude module for convenient imports
///
/// ```ignore
/// use hyocr_rs::prelude::*;
/// ```
pub mod prelude {
  pub use crate::{
    analyze, probe_dimensions, Analysis, ChatCompletionsEngine, DimensionHint, ImageSource,
    OcrConfig, Settings, DEFAULT_PROMPT,
  };
  pub use hyocr_core::{
    format_coordinate_info, parse_ocr_content, sniff_dimensions, ImageDimensions, OcrEngine,
    OcrRequest, TextBlock,
  };
}
