use crate::block::{TextBlock, NORMALIZED_RANGE};
use crate::dimensions::ImageDimensions;
use crate::scale::{convert_blocks_to_pixels, ScaleFactors};

const RULE_WIDTH: usize = 80;

/// Cuts `text` to at most `width` characters, marking the cut with `..`.
fn truncate_label(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width - 2).collect();
        format!("{kept}..")
    } else {
        text.to_string()
    }
}

/// Pads on the right to `width` characters.
fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Renders blocks as a plain-text table, with a pixel column when dimensions are known.
pub fn format_coordinate_info(blocks: &[TextBlock], dims: Option<ImageDimensions>) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::new();

    if let Some(dims) = dims {
        let factors = ScaleFactors::new(dims);
        lines.push(format!("Image dimensions: {} x {} pixels", dims.width, dims.height));
        lines.push(format!(
            "Scale factors: x={:.3}, y={:.3}",
            factors.scale_x, factors.scale_y
        ));
        lines.push(format!(
            "(coordinates are normalized to the [0-{NORMALIZED_RANGE}] range)"
        ));
        lines.push(String::new());
    }

    lines.push(format!("Found {} text elements:", blocks.len()));
    lines.push(rule.clone());

    match dims {
        Some(dims) => {
            lines.push(format!(
                "{:>4}  {}  {}  Pixels",
                "No.",
                pad("Text", 35),
                pad("Normalized", 20)
            ));
            lines.push(rule.clone());

            for (i, block) in convert_blocks_to_pixels(blocks, dims).iter().enumerate() {
                let n = &block.normalized;
                let norm = format!("({},{})→({},{})", n.x1, n.y1, n.x2, n.y2);
                let pixel = block
                    .pixel
                    .map(|p| format!("({},{})→({},{})", p.x1, p.y1, p.x2, p.y2))
                    .unwrap_or_default();
                lines.push(format!(
                    "{:>4}  {}  {}  {}",
                    i + 1,
                    pad(&truncate_label(&block.text, 35), 35),
                    pad(&norm, 20),
                    pixel
                ));
            }
        }
        None => {
            lines.push(format!(
                "{:>4}  {}  Coordinates (normalized 0-{NORMALIZED_RANGE})",
                "No.",
                pad("Text", 40)
            ));
            lines.push(rule.clone());

            for (i, block) in blocks.iter().enumerate() {
                let n = &block.normalized;
                lines.push(format!(
                    "{:>4}  {}  ({},{}) → ({},{})",
                    i + 1,
                    pad(&truncate_label(&block.text, 40), 40),
                    n.x1,
                    n.y1,
                    n.x2,
                    n.y2
                ));
            }
        }
    }

    lines.push(rule);
    lines.join("\n")
}
