//! # hyocr-core
//!
//! Turns the coordinate-annotated text emitted by grounding OCR services
//! (`label(x1,y1),(x2,y2)` runs in a `[0, 1000]` normalized space) into
//! structured [`TextBlock`]s, and maps those boxes into pixel space once the
//! image size is known, either supplied by the caller or sniffed from the
//! image header.
//!
//! ```
//! use hyocr_core::{parse_ocr_content, sniff_dimensions, ImageDimensions};
//!
//! let blocks = parse_ocr_content("文字(53,27),(139,55)");
//! let dims = ImageDimensions::new(2428, 1438).unwrap();
//! let pixel = blocks[0].clone().with_pixels(dims).pixel.unwrap();
//! assert_eq!((pixel.x1, pixel.y1), (128, 38));
//!
//! assert!(sniff_dimensions(b"not an image").is_err());
//! ```

pub mod block;
pub mod dimensions;
pub mod engine;
pub mod parser;
pub mod report;
pub mod scale;

pub use block::{NormalizedBox, PixelBox, TextBlock, NORMALIZED_RANGE};
pub use dimensions::{
    resolve_dimensions, sniff_dimensions, DimensionError, ImageDimensions, ImageFormat,
    MAX_SNIFF_BYTES,
};
pub use engine::{OcrEngine, OcrError, OcrOutput, OcrRequest};
pub use parser::{parse_ocr_content, ParsedContent};
pub use report::format_coordinate_info;
pub use scale::{convert_blocks_to_pixels, normalized_to_pixel, pixel_to_normalized, ScaleFactors};
