//! Turns one OCR response into a report: parsed blocks, pixel boxes when the image
//! size can be resolved, and a log of the steps taken along the way.
use anyhow::{Context, Result};
use hyocr_core::{
  format_coordinate_info, resolve_dimensions, ImageDimensions, OcrEngine, OcrRequest,
  ParsedContent, ScaleFactors, TextBlock, NORMALIZED_RANGE,
};
use serde::Serialize;
use std::time::Duration;

use crate::fetch::{fetch_header, FetchError, ImageSource};

/// Box colors, assigned to blocks in rotation.
pub const COLOR_PALETTE: [&str; 8] = [
  "#f97316", "#22c55e", "#0ea5e9", "#a855f7", "#e11d48", "#06b6d4", "#d97706", "#10b981",
];

/// How to learn the image size for pixel conversion.
#[derive(Debug, Clone)]
pub enum DimensionHint {
  Explicit { width: u32, height: u32 },
  Probe(ImageSource),
  Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxReport<T> {
  pub x1: T,
  pub y1: T,
  pub x2: T,
  pub y2: T,
  pub width: T,
  pub height: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockReport {
  pub index: usize,
  pub text: String,
  pub color: &'static str,
  pub normalized: BoxReport<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pixel: Option<BoxReport<u64>>,
}

impl BlockReport {
  fn new(position: usize, block: &TextBlock) -> Self {
    let n = &block.normalized;
    Self {
      index: position + 1,
      text: block.text.clone(),
      color: COLOR_PALETTE[position % COLOR_PALETTE.len()],
      normalized: BoxReport {
        x1: n.x1,
        y1: n.y1,
        x2: n.x2,
        y2: n.y2,
        width: n.width(),
        height: n.height(),
      },
      pixel: block.pixel.map(|p| BoxReport {
        x1: p.x1,
        y1: p.y1,
        x2: p.x2,
        y2: p.y2,
        width: p.width(),
        height: p.height(),
      }),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoordInfo {
  pub normalized_range: u32,
  pub scale_x: Option<f64>,
  pub scale_y: Option<f64>,
  pub description: String,
}

/// Everything learned from one response.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
  #[serde(flatten)]
  content: ParsedContent,
  pub blocks: Vec<BlockReport>,
  pub image_size: Option<ImageDimensions>,
  pub coord_info: CoordInfo,
  pub steps: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub endpoint: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub model: Option<String>,
}

impl Analysis {
  fn assemble(content: ParsedContent, dims: Option<ImageDimensions>, steps: Vec<String>) -> Self {
    let content = match dims {
      Some(dims) => content.with_pixels(dims),
      None => content,
    };
    let factors = dims.map(ScaleFactors::new);

    Self {
      blocks: content
        .blocks
        .iter()
        .enumerate()
        .map(|(i, b)| BlockReport::new(i, b))
        .collect(),
      image_size: dims,
      coord_info: CoordInfo {
        normalized_range: NORMALIZED_RANGE,
        scale_x: factors.map(|f| f.scale_x),
        scale_y: factors.map(|f| f.scale_y),
        description: format!(
          "coordinates are normalized to the [0-{}] range",
          NORMALIZED_RANGE
        ),
      },
      steps,
      endpoint: None,
      model: None,
      content,
    }
  }

  /// Offline analysis of text that was already fetched from the service.
  pub async fn from_raw_text(raw_text: &str, hint: &DimensionHint, fetch_timeout: Duration) -> Self {
    let mut steps = vec!["Parsing OCR response".to_string()];
    let content = ParsedContent::parse(raw_text);

    let dims = if content.is_structured() {
      dimensions_or_warn(hint, fetch_timeout, &mut steps).await
    } else {
      None
    };
    steps.push("Done".to_string());

    Self::assemble(content, dims, steps)
  }

  pub fn raw_text(&self) -> &str {
    &self.content.raw
  }

  pub fn text_blocks(&self) -> &[TextBlock] {
    &self.content.blocks
  }

  /// Raw response to show verbatim when nothing could be parsed.
  pub fn fallback_text(&self) -> Option<&str> {
    self.content.fallback_text()
  }

  /// Plain-text table, or the raw text when no block was found.
  pub fn render_text(&self) -> String {
    match self.fallback_text() {
      Some(raw) => raw.to_string(),
      None => format_coordinate_info(&self.content.blocks, self.image_size),
    }
  }
}

/// Resolves `hint` to dimensions. `Unknown` resolves to `None`.
pub async fn resolve_hint(
  hint: &DimensionHint,
  fetch_timeout: Duration,
) -> Result<Option<ImageDimensions>, FetchError> {
  match hint {
    DimensionHint::Explicit { width, height } => {
      Ok(Some(resolve_dimensions(Some((*width, *height)), None)?))
    }
    DimensionHint::Probe(source) => {
      let header = fetch_header(source, fetch_timeout).await?;
      Ok(Some(resolve_dimensions(None, Some(&header))?))
    }
    DimensionHint::Unknown => Ok(None),
  }
}

/// Like [`resolve_hint`], but a failure becomes a warning step and `None`.
async fn dimensions_or_warn(
  hint: &DimensionHint,
  fetch_timeout: Duration,
  steps: &mut Vec<String>,
) -> Option<ImageDimensions> {
  if let DimensionHint::Probe(_) = hint {
    steps.push("Fetching image for dimension analysis".to_string());
  }

  match resolve_hint(hint, fetch_timeout).await {
    Ok(dims) => dims,
    Err(e) => {
      tracing::warn!(error = %e, "could not determine image dimensions, keeping normalized coordinates");
      steps.push(format!("Warning: Could not determine image dimensions - {}", e));
      None
    }
  }
}

/// Runs one image through `engine` and builds the report.
///
/// Dimensions come from `explicit` when given, otherwise from the header of the
/// image at `request.image_url`. They are only looked up when at least one block
/// was parsed.
pub async fn analyze(
  engine: &dyn OcrEngine,
  request: &OcrRequest,
  explicit: Option<(u32, u32)>,
  fetch_timeout: Duration,
) -> Result<Analysis> {
  let mut steps = vec!["Received request".to_string()];

  steps.push("Calling OCR endpoint".to_string());
  let output = engine
    .recognize(request)
    .await
    .with_context(|| format!("OCR request to {} failed", engine.endpoint()))?;

  steps.push("Parsing OCR response".to_string());
  tracing::info!(blocks = output.blocks.len(), "parsed OCR response");

  let content = ParsedContent::from(output);
  let dims = if content.is_structured() {
    let hint = match explicit {
      Some((width, height)) => DimensionHint::Explicit { width, height },
      None => DimensionHint::Probe(ImageSource::parse(&request.image_url)),
    };
    dimensions_or_warn(&hint, fetch_timeout, &mut steps).await
  } else {
    None
  };
  steps.push("Done".to_string());

  let mut analysis = Analysis::assemble(content, dims, steps);
  analysis.endpoint = Some(engine.endpoint().to_string());
  analysis.model = Some(engine.model().to_string());
  Ok(analysis)
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use hyocr_core::{OcrError, OcrOutput};
  use std::io::Write;

  const SAMPLE: &str = "文字(53,27),(139,55)另一段(100,200),(300,400)";

  struct CannedEngine {
    reply: Result<&'static str, u16>,
  }

  #[async_trait]
  impl OcrEngine for CannedEngine {
    async fn recognize(&self, _request: &OcrRequest) -> Result<OcrOutput, OcrError> {
      match self.reply {
        Ok(text) => Ok(OcrOutput::from_raw_text(text)),
        Err(status) => Err(OcrError::Http {
          status,
          message: "overloaded".to_string(),
        }),
      }
    }

    fn endpoint(&self) -> &str {
      "memory://canned"
    }

    fn model(&self) -> &str {
      "canned-model"
    }
  }

  fn request(image_url: &str) -> OcrRequest {
    OcrRequest {
      image_url: image_url.to_string(),
      prompt: "read".to_string(),
    }
  }

  #[tokio::test]
  async fn test_explicit_dimensions_produce_pixels() {
    let engine = CannedEngine { reply: Ok(SAMPLE) };
    let analysis = analyze(&engine, &request("unused"), Some((2428, 1438)), Duration::from_secs(1))
      .await
      .unwrap();

    assert_eq!(analysis.blocks.len(), 2);
    let first = &analysis.blocks[0];
    assert_eq!(first.index, 1);
    assert_eq!(first.color, "#f97316");
    let pixel = first.pixel.as_ref().unwrap();
    assert_eq!((pixel.x1, pixel.y1), (128, 38));
    assert_eq!(analysis.blocks[1].color, "#22c55e");
    assert_eq!(analysis.endpoint.as_deref(), Some("memory://canned"));
    assert_eq!(analysis.steps.last().map(String::as_str), Some("Done"));
    assert!(analysis.fallback_text().is_none());
  }

  #[tokio::test]
  async fn test_probe_failure_degrades_to_normalized() {
    let engine = CannedEngine { reply: Ok(SAMPLE) };
    let analysis = analyze(
      &engine,
      &request("/no/such/image.png"),
      None,
      Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert_eq!(analysis.blocks.len(), 2);
    assert!(analysis.image_size.is_none());
    assert!(analysis.blocks.iter().all(|b| b.pixel.is_none()));
    assert!(analysis.coord_info.scale_x.is_none());
    assert!(analysis.steps.iter().any(|s| s.starts_with("Warning:")));
  }

  #[tokio::test]
  async fn test_probe_reads_local_header() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    png.extend_from_slice(&13u32.to_be_bytes());
    png.extend_from_slice(b"IHDR");
    png.extend_from_slice(&800u32.to_be_bytes());
    png.extend_from_slice(&600u32.to_be_bytes());
    file.write_all(&png).unwrap();

    let engine = CannedEngine { reply: Ok(SAMPLE) };
    let path = file.path().to_string_lossy().to_string();
    let analysis = analyze(&engine, &request(&path), None, Duration::from_secs(5))
      .await
      .unwrap();

    assert_eq!(analysis.image_size, ImageDimensions::new(800, 600));
    let pixel = analysis.blocks[1].pixel.as_ref().unwrap();
    assert_eq!((pixel.x2, pixel.y2), (240, 240));
    assert!((analysis.coord_info.scale_x.unwrap() - 0.8).abs() < 1e-12);
  }

  #[tokio::test]
  async fn test_no_blocks_skips_dimension_lookup() {
    let engine = CannedEngine {
      reply: Ok("plain text without boxes"),
    };
    let analysis = analyze(&engine, &request("/no/such/image.png"), None, Duration::from_secs(1))
      .await
      .unwrap();

    assert!(analysis.blocks.is_empty());
    assert_eq!(analysis.fallback_text(), Some("plain text without boxes"));
    assert_eq!(analysis.render_text(), "plain text without boxes");
    assert!(!analysis.steps.iter().any(|s| s.contains("dimension")));
  }

  #[tokio::test]
  async fn test_engine_error_propagates() {
    let engine = CannedEngine { reply: Err(503) };
    let err = analyze(&engine, &request("x"), None, Duration::from_secs(1))
      .await
      .unwrap_err();
    assert!(err.to_string().contains("memory://canned"));
  }

  #[tokio::test]
  async fn test_from_raw_text_serializes() {
    let hint = DimensionHint::Explicit {
      width: 1000,
      height: 1000,
    };
    let analysis = Analysis::from_raw_text(SAMPLE, &hint, Duration::from_secs(1)).await;
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["raw_text"], SAMPLE);
    assert_eq!(analysis.raw_text(), SAMPLE);
    assert_eq!(json["blocks"][0]["text"], "文字");
    assert_eq!(json["blocks"][1]["pixel"]["x2"], 300);
    assert_eq!(json["image_size"]["width"], 1000);
    assert_eq!(json["coord_info"]["normalized_range"], 1000);
    assert!(json.get("endpoint").is_none());
    assert!(json.get("text_blocks").is_none());
  }

  #[tokio::test]
  async fn test_invalid_explicit_dimensions_warn() {
    let hint = DimensionHint::Explicit {
      width: 0,
      height: 10,
    };
    let analysis = Analysis::from_raw_text(SAMPLE, &hint, Duration::from_secs(1)).await;
    assert!(analysis.image_size.is_none());
    assert!(analysis.steps.iter().any(|s| s.starts_with("Warning:")));
  }
}
