use serde::Serialize;

use crate::dimensions::ImageDimensions;
use crate::scale::normalized_to_pixel;

/// Width and height of the resolution-independent coordinate space.
pub const NORMALIZED_RANGE: u32 = 1000;

/// Box in normalized `[0, 1000]` units, exactly as the service emitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl NormalizedBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Scales each corner into pixel space. Values above 1000 are not clamped.
    pub fn to_pixels(&self, dims: ImageDimensions) -> PixelBox {
        let (x1, y1) = normalized_to_pixel(self.x1, self.y1, dims);
        let (x2, y2) = normalized_to_pixel(self.x2, self.y2, dims);
        PixelBox { x1, y1, x2, y2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelBox {
    pub x1: u64,
    pub y1: u64,
    pub x2: u64,
    pub y2: u64,
}

impl PixelBox {
    pub fn width(&self) -> u64 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u64 {
        self.y2.saturating_sub(self.y1)
    }
}

/// One recognized text span with its bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub normalized: NormalizedBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel: Option<PixelBox>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, normalized: NormalizedBox) -> Self {
        Self {
            text: text.into(),
            normalized,
            pixel: None,
        }
    }

    pub fn with_pixels(mut self, dims: ImageDimensions) -> Self {
        self.pixel = Some(self.normalized.to_pixels(dims));
        self
    }
}
