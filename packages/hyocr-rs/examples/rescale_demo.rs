use anyhow::Result;
use hyocr_rs::prelude::*;

fn main() -> Result<()> {
    let raw = "文字(53,27),(139,55)另一段(100,200),(300,400)";

    let blocks = parse_ocr_content(raw);
    println!("Parsed {} blocks from raw response", blocks.len());
    println!();

    // Normalized only, as when the image size cannot be determined
    println!("{}", format_coordinate_info(&blocks, None));
    println!();

    let sizes = vec![(2428, 1438), (800, 600), (1000, 1000)];
    for (width, height) in sizes {
        let Some(dims) = ImageDimensions::new(width, height) else {
            continue;
        };
        println!("{}", format_coordinate_info(&blocks, Some(dims)));
        println!("{}", "=".repeat(60));
    }

    Ok(())
}
