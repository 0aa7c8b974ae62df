//! Integration tests for the hyocr-rs library API

#[test]
fn test_prelude_imports() {
    use hyocr_rs::prelude::*;

    let blocks = parse_ocr_content("文字(53,27),(139,55)");
    assert_eq!(blocks.len(), 1);

    let dims = ImageDimensions::new(2428, 1438).unwrap();
    let table = format_coordinate_info(&blocks, Some(dims));
    assert!(table.contains("(128,38)"));

    assert!(sniff_dimensions(b"nope").is_err());
    assert!(DEFAULT_PROMPT.contains("coordinates"));
}

#[test]
fn test_config_types() {
    use hyocr_rs::OcrConfig;

    let config = OcrConfig {
        endpoint: "https://ocr.example.com/v1/".into(),
        ..OcrConfig::default()
    };
    assert_eq!(config.base_url(), "https://ocr.example.com/v1");
}

#[test]
fn test_engine_construction() {
    use hyocr_rs::{ChatCompletionsEngine, OcrConfig};
    use hyocr_core::OcrEngine;

    let engine = ChatCompletionsEngine::new(OcrConfig::default()).unwrap();
    assert_eq!(engine.model(), hyocr_rs::config::DEFAULT_MODEL);
    assert_eq!(engine.endpoint(), engine.config().endpoint);
}

#[tokio::test]
async fn test_offline_analysis() {
    use hyocr_rs::{Analysis, DimensionHint};
    use std::time::Duration;

    let analysis = Analysis::from_raw_text(
        "A(0,0),(500,500)",
        &DimensionHint::Explicit {
            width: 640,
            height: 480,
        },
        Duration::from_secs(1),
    )
    .await;

    let pixel = analysis.text_blocks()[0].pixel.unwrap();
    assert_eq!((pixel.x2, pixel.y2), (320, 240));
    assert_eq!(analysis.blocks[0].color, hyocr_rs::COLOR_PALETTE[0]);
}
