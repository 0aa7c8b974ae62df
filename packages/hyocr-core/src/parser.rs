//! Parsing of `label(x1,y1),(x2,y2)` runs out of a raw OCR response.
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::block::{NormalizedBox, TextBlock};
use crate::dimensions::ImageDimensions;

/// Label is anything but a parenthesis; the comma between the two pairs is optional.
static BLOCK_PATTERN: OnceLock<Regex> = OnceLock::new();

fn block_pattern() -> &'static Regex {
    BLOCK_PATTERN.get_or_init(|| {
        Regex::new(r"([^()]+)\(([0-9]+),([0-9]+)\),?\(([0-9]+),([0-9]+)\)")
            .expect("block pattern is a valid regex")
    })
}

/// Extracts every text block from `content`, in the order the service emitted them.
///
/// Returns an empty `Vec` when nothing matches; that is not an error and the caller
/// should show `content` verbatim instead. A label containing `(` or `)` cannot be
/// represented and the match boundary falls on that character.
pub fn parse_ocr_content(content: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();

    for caps in block_pattern().captures_iter(content) {
        let coords: Option<Vec<u32>> = (2..=5).map(|i| caps[i].parse().ok()).collect();
        let Some(coords) = coords else {
            tracing::warn!(matched = &caps[0], "coordinate out of u32 range, skipping block");
            continue;
        };

        blocks.push(TextBlock::new(
            caps[1].trim(),
            NormalizedBox::new(coords[0], coords[1], coords[2], coords[3]),
        ));
    }

    tracing::debug!(count = blocks.len(), "parsed text blocks");
    blocks
}

/// Parse result that keeps the raw text for the no-match fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedContent {
    #[serde(rename = "raw_text")]
    pub raw: String,
    #[serde(skip)]
    pub blocks: Vec<TextBlock>,
}

impl ParsedContent {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let blocks = parse_ocr_content(&raw);
        Self { raw, blocks }
    }

    pub fn is_structured(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Raw text to display when no block could be parsed.
    pub fn fallback_text(&self) -> Option<&str> {
        if self.is_structured() {
            None
        } else {
            Some(&self.raw)
        }
    }

    /// Attaches pixel boxes to every block.
    pub fn with_pixels(mut self, dims: ImageDimensions) -> Self {
        self.blocks = self.blocks.into_iter().map(|b| b.with_pixels(dims)).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_blocks_in_reading_order() {
        let blocks = parse_ocr_content("文字(53,27),(139,55)另一段(100,200),(300,400)");
        assert_eq!(
            blocks,
            vec![
                TextBlock::new("文字", NormalizedBox::new(53, 27, 139, 55)),
                TextBlock::new("另一段", NormalizedBox::new(100, 200, 300, 400)),
            ]
        );
    }

    #[test]
    fn test_no_pattern_yields_empty() {
        assert!(parse_ocr_content("just some plain text").is_empty());
        assert!(parse_ocr_content("").is_empty());
        assert!(parse_ocr_content("half(1,2) only").is_empty());
    }

    #[test]
    fn test_label_is_trimmed() {
        let blocks = parse_ocr_content("\n  Hello world \t(1,2),(3,4)\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Hello world");
    }

    #[test]
    fn test_comma_between_pairs_is_optional() {
        let blocks = parse_ocr_content("A(1,2)(3,4)B(5,6),(7,8)");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].normalized, NormalizedBox::new(1, 2, 3, 4));
        assert_eq!(blocks[1].text, "B");
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let blocks = parse_ocr_content("wide(0,0),(1500,2000)");
        assert_eq!(blocks[0].normalized, NormalizedBox::new(0, 0, 1500, 2000));
    }

    #[test]
    fn test_parenthesis_in_label_moves_boundary() {
        let blocks = parse_ocr_content("Price (USD)(10,20),(30,40)");
        assert_eq!(blocks.len(), 0);

        let blocks = parse_ocr_content("f(x) total(10,20),(30,40)");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "total");
    }

    #[test]
    fn test_overflowing_capture_is_skipped() {
        let blocks = parse_ocr_content("bad(99999999999,1),(2,3)good(1,2),(3,4)");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "good");
    }

    #[test]
    fn test_fallback_text() {
        let parsed = ParsedContent::parse("no coordinates here");
        assert!(!parsed.is_structured());
        assert_eq!(parsed.fallback_text(), Some("no coordinates here"));

        let parsed = ParsedContent::parse("x(1,2),(3,4)");
        assert_eq!(parsed.fallback_text(), None);
    }

    #[test]
    fn test_parsed_content_with_pixels() {
        let dims = ImageDimensions::new(2428, 1438).unwrap();
        let parsed = ParsedContent::parse("文字(53,27),(139,55)").with_pixels(dims);
        let pixel = parsed.blocks[0].pixel.unwrap();
        assert_eq!((pixel.x1, pixel.y1, pixel.x2, pixel.y2), (128, 38, 337, 79));
        assert_eq!(parsed.raw, "文字(53,27),(139,55)");
    }
}
