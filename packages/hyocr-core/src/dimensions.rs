//! Recovers image width/height from the first bytes of a file without decoding it.
//!
//! Four container formats are recognized by their magic bytes: PNG, JPEG, GIF and BMP.
//! Each is a fixed-layout read of a few integer fields; anything else is reported as
//! [`DimensionError::UnknownFormat`] rather than guessed at.
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Upper bound on how much of a resource the sniffer will look at.
pub const MAX_SNIFF_BYTES: usize = 64 * 1024;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: &[u8] = &[0xFF, 0xD8];
const GIF_SIGNATURES: [&[u8]; 2] = [b"GIF87a", b"GIF89a"];
const BMP_SIGNATURE: &[u8] = b"BM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Returns `None` unless both sides are positive.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DimensionError {
    #[error("unknown image format")]
    UnknownFormat,
    #[error("{format} header truncated: need {needed} bytes, have {available}")]
    Truncated {
        format: ImageFormat,
        needed: usize,
        available: usize,
    },
    #[error("no start-of-frame marker found in jpeg header")]
    MissingFrame,
    #[error("{format} header declares a zero dimension ({width}x{height})")]
    ZeroDimension {
        format: ImageFormat,
        width: u32,
        height: u32,
    },
    #[error("explicit dimensions must be positive, got {width}x{height}")]
    InvalidExplicit { width: u32, height: u32 },
}

/// Explicit values win; otherwise the header is sniffed.
pub fn resolve_dimensions(
    explicit: Option<(u32, u32)>,
    header: Option<&[u8]>,
) -> Result<ImageDimensions, DimensionError> {
    if let Some((width, height)) = explicit {
        return ImageDimensions::new(width, height)
            .ok_or(DimensionError::InvalidExplicit { width, height });
    }

    match header {
        Some(bytes) => sniff_dimensions(bytes).map(|(_, dims)| dims),
        None => Err(DimensionError::UnknownFormat),
    }
}

/// Detects the container format and reads its width/height fields.
///
/// Only the first [`MAX_SNIFF_BYTES`] of `data` are considered.
pub fn sniff_dimensions(data: &[u8]) -> Result<(ImageFormat, ImageDimensions), DimensionError> {
    let data = &data[..data.len().min(MAX_SNIFF_BYTES)];

    let (format, width, height) = if data.starts_with(PNG_SIGNATURE) {
        let (w, h) = sniff_png(data)?;
        (ImageFormat::Png, w, h)
    } else if data.starts_with(JPEG_SOI) {
        let (w, h) = sniff_jpeg(data)?;
        (ImageFormat::Jpeg, w, h)
    } else if GIF_SIGNATURES.iter().any(|sig| data.starts_with(sig)) {
        let (w, h) = sniff_gif(data)?;
        (ImageFormat::Gif, w, h)
    } else if data.starts_with(BMP_SIGNATURE) {
        let (w, h) = sniff_bmp(data)?;
        (ImageFormat::Bmp, w, h)
    } else {
        return Err(DimensionError::UnknownFormat);
    };

    let dims = ImageDimensions::new(width, height).ok_or(DimensionError::ZeroDimension {
        format,
        width,
        height,
    })?;
    tracing::debug!(%format, %dims, "sniffed image dimensions");
    Ok((format, dims))
}

fn field<const N: usize>(
    data: &[u8],
    offset: usize,
    format: ImageFormat,
) -> Result<[u8; N], DimensionError> {
    data.get(offset..offset + N)
        .and_then(|s| s.try_into().ok())
        .ok_or(DimensionError::Truncated {
            format,
            needed: offset + N,
            available: data.len(),
        })
}

// Signature, IHDR length and type, then big-endian width and height.
fn sniff_png(data: &[u8]) -> Result<(u32, u32), DimensionError> {
    let width = u32::from_be_bytes(field(data, 16, ImageFormat::Png)?);
    let height = u32::from_be_bytes(field(data, 20, ImageFormat::Png)?);
    Ok((width, height))
}

fn sniff_jpeg(data: &[u8]) -> Result<(u32, u32), DimensionError> {
    let mut idx = JPEG_SOI.len();

    while idx < data.len() {
        if data[idx] != 0xFF {
            idx += 1;
            continue;
        }
        let marker = field::<1>(data, idx + 1, ImageFormat::Jpeg)?[0];
        match marker {
            // Fill byte before the real marker.
            0xFF => idx += 1,
            // EOI
            0xD9 => return Err(DimensionError::MissingFrame),
            // SOF0 / SOF2: length(2) precision(1) height(2) width(2)
            0xC0 | 0xC2 => {
                let height = u16::from_be_bytes(field(data, idx + 5, ImageFormat::Jpeg)?);
                let width = u16::from_be_bytes(field(data, idx + 7, ImageFormat::Jpeg)?);
                return Ok((u32::from(width), u32::from(height)));
            }
            // Standalone markers carry no length field.
            0x01 | 0xD0..=0xD8 => idx += 2,
            _ => {
                let length = u16::from_be_bytes(field(data, idx + 2, ImageFormat::Jpeg)?);
                idx += 2 + usize::from(length);
            }
        }
    }

    // The walk ran off the end; a full window may have cut the frame off.
    if data.len() >= MAX_SNIFF_BYTES {
        return Err(DimensionError::Truncated {
            format: ImageFormat::Jpeg,
            needed: idx + 1,
            available: data.len(),
        });
    }
    Err(DimensionError::MissingFrame)
}

fn sniff_gif(data: &[u8]) -> Result<(u32, u32), DimensionError> {
    let width = u16::from_le_bytes(field(data, 6, ImageFormat::Gif)?);
    let height = u16::from_le_bytes(field(data, 8, ImageFormat::Gif)?);
    Ok((u32::from(width), u32::from(height)))
}

// BITMAPINFOHEADER stores signed sizes; a negative height means top-down rows.
fn sniff_bmp(data: &[u8]) -> Result<(u32, u32), DimensionError> {
    let width = i32::from_le_bytes(field(data, 18, ImageFormat::Bmp)?);
    let height = i32::from_le_bytes(field(data, 22, ImageFormat::Bmp)?);
    Ok((width.unsigned_abs(), height.unsigned_abs()))
}
