//! Conversion between normalized `[0, 1000]` coordinates and image pixels.
use serde::Serialize;

use crate::block::{TextBlock, NORMALIZED_RANGE};
use crate::dimensions::ImageDimensions;

/// Pixels per normalized unit along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleFactors {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ScaleFactors {
    pub fn new(dims: ImageDimensions) -> Self {
        let range = f64::from(NORMALIZED_RANGE);
        Self {
            scale_x: f64::from(dims.width) / range,
            scale_y: f64::from(dims.height) / range,
        }
    }
}

/// `floor(n * dim / 1000)` per axis, computed exactly in integers. No clamping.
pub fn normalized_to_pixel(norm_x: u32, norm_y: u32, dims: ImageDimensions) -> (u64, u64) {
    (
        scale_axis(norm_x, dims.width),
        scale_axis(norm_y, dims.height),
    )
}

fn scale_axis(value: u32, extent: u32) -> u64 {
    u64::from(value) * u64::from(extent) / u64::from(NORMALIZED_RANGE)
}

pub fn pixel_to_normalized(pixel_x: u64, pixel_y: u64, dims: ImageDimensions) -> (f64, f64) {
    let range = f64::from(NORMALIZED_RANGE);
    (
        pixel_x as f64 * range / f64::from(dims.width),
        pixel_y as f64 * range / f64::from(dims.height),
    )
}

/// Returns copies of `blocks` with their pixel boxes filled in.
pub fn convert_blocks_to_pixels(blocks: &[TextBlock], dims: ImageDimensions) -> Vec<TextBlock> {
    blocks
        .iter()
        .cloned()
        .map(|block| block.with_pixels(dims))
        .collect()
}
