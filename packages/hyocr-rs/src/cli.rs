//! Command line arguments backing the `hyocr` binary.
use clap::{Args as ClapArgs, Parser, Subcommand};
use hyocr_rs::settings::DEFAULT_SETTINGS_FILE;
use std::path::PathBuf;

/// One week.
pub const MAX_KEEPALIVE_MINUTES: u64 = 7 * 24 * 60;

#[derive(Parser, Debug)]
#[command(
  name = "hyocr",
  about = "Parse coordinate-annotated OCR output and map its boxes onto image pixels",
  version
)]
pub struct Args {
  /// Only log warnings and errors
  #[arg(long, short = 'q', global = true)]
  pub quiet: bool,

  #[command(subcommand)]
  pub command: Commands,
}

/// Explicit image size, overriding header sniffing.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SizeArgs {
  /// Image width in pixels
  #[arg(long, requires = "height", value_parser = clap::value_parser!(u32).range(1..))]
  pub width: Option<u32>,

  /// Image height in pixels
  #[arg(long, requires = "width", value_parser = clap::value_parser!(u32).range(1..))]
  pub height: Option<u32>,
}

impl SizeArgs {
  pub fn explicit(&self) -> Option<(u32, u32)> {
    self.width.zip(self.height)
  }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Parse raw OCR output from a file or stdin
  Parse {
    /// File holding the raw response text; reads stdin when omitted
    input: Option<PathBuf>,

    #[command(flatten)]
    size: SizeArgs,

    /// Image (path or http(s) URL) whose header supplies the dimensions
    #[arg(long, short = 'i', conflicts_with_all = ["width", "height"])]
    image: Option<String>,

    /// Emit the analysis as JSON
    #[arg(long)]
    json: bool,
  },
  /// Print the dimensions of an image by reading its header
  Dims {
    /// Image path or http(s) URL
    source: String,
  },
  /// Send an image to the OCR service and report the detected text blocks
  Recognize {
    /// Image URL; falls back to the last saved one, then the sample image
    image_url: Option<String>,

    /// Instruction sent alongside the image
    #[arg(long, short = 'p')]
    prompt: Option<String>,

    /// Service base URL (overrides HY_OCR_ENDPOINT)
    #[arg(long, short = 'e')]
    endpoint: Option<String>,

    /// Model name (overrides HY_OCR_MODEL)
    #[arg(long, short = 'm')]
    model: Option<String>,

    #[command(flatten)]
    size: SizeArgs,

    /// Emit the analysis as JSON
    #[arg(long)]
    json: bool,

    /// Where the last-used image URL and prompt are remembered
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
  },
  /// Keep the OCR service warm by polling it on an interval
  Keepalive {
    /// Service base URL (overrides HY_OCR_ENDPOINT)
    #[arg(long, short = 'e')]
    endpoint: Option<String>,

    /// Seconds between polls
    #[arg(long, default_value = "60")]
    interval_secs: u64,

    /// Total minutes to keep polling
    #[arg(
      long,
      default_value = "30",
      value_parser = clap::value_parser!(u64).range(1..=MAX_KEEPALIVE_MINUTES)
    )]
    duration_mins: u64,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_recognize_defaults_to_settings_file() {
    let args = Args::try_parse_from(["hyocr", "recognize"]).unwrap();
    match args.command {
      Commands::Recognize { settings, .. } => {
        assert_eq!(settings, PathBuf::from(DEFAULT_SETTINGS_FILE));
      }
      other => panic!("unexpected command: {:?}", other),
    }
  }

  #[test]
  fn test_keepalive_duration_is_bounded() {
    let args = Args::try_parse_from(["hyocr", "keepalive", "--duration-mins", "10080"]).unwrap();
    assert!(matches!(
      args.command,
      Commands::Keepalive {
        duration_mins: MAX_KEEPALIVE_MINUTES,
        ..
      }
    ));

    assert!(Args::try_parse_from(["hyocr", "keepalive", "--duration-mins", "0"]).is_err());
    assert!(
      Args::try_parse_from(["hyocr", "keepalive", "--duration-mins", "18446744073709551615"]).is_err()
    );
  }
}
