mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Args, Commands};
use hyocr_core::OcrRequest;
use hyocr_rs::{
  analyze, probe_dimensions, Analysis, ChatCompletionsEngine, DimensionHint, ImageSource,
  OcrConfig, Settings,
};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(quiet: bool) {
  let default_level = if quiet { "warn" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn print_analysis(analysis: &Analysis, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(analysis)?);
  } else {
    if analysis.fallback_text().is_some() {
      tracing::warn!("no coordinate blocks found, showing raw text");
    }
    println!("{}", analysis.render_text());
  }
  Ok(())
}

async fn read_input(input: Option<PathBuf>) -> Result<String> {
  match input {
    Some(path) => tokio::fs::read_to_string(&path)
      .await
      .with_context(|| format!("failed to read {}", path.display())),
    None => tokio::task::spawn_blocking(|| {
      let mut buf = String::new();
      std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    })
    .await?
    .context("failed to read stdin"),
  }
}

async fn run(args: Args) -> Result<()> {
  let mut config = OcrConfig::from_env();

  match args.command {
    Commands::Version => {
      println!("hyocr {}", env!("CARGO_PKG_VERSION"));
    }
    Commands::Parse {
      input,
      size,
      image,
      json,
    } => {
      let raw = read_input(input).await?;
      let hint = match (size.explicit(), image) {
        (Some((width, height)), _) => DimensionHint::Explicit { width, height },
        (None, Some(source)) => DimensionHint::Probe(ImageSource::parse(&source)),
        (None, None) => DimensionHint::Unknown,
      };
      let analysis = Analysis::from_raw_text(&raw, &hint, config.fetch_timeout).await;
      print_analysis(&analysis, json)?;
    }
    Commands::Dims { source } => {
      let (format, dims) = probe_dimensions(&ImageSource::parse(&source), config.fetch_timeout)
        .await
        .with_context(|| format!("could not determine dimensions of {}", source))?;
      println!("{} ({})", dims, format);
    }
    Commands::Recognize {
      image_url,
      prompt,
      endpoint,
      model,
      size,
      json,
      settings,
    } => {
      if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
      }
      if let Some(model) = model {
        config.model = model;
      }

      let mut saved = Settings::load(&settings).await?;
      let image_url = image_url
        .or_else(|| saved.image_url.clone())
        .unwrap_or_else(|| config.sample_image_url.clone());
      let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .or_else(|| saved.prompt.clone())
        .unwrap_or_else(|| config.prompt.clone());

      if image_url.trim().is_empty() {
        return Err(anyhow!("image_url is required"));
      }

      saved.image_url = Some(image_url.clone());
      saved.prompt = Some(prompt.clone());
      if let Err(e) = saved.save(&settings).await {
        tracing::warn!(error = %e, "could not save settings");
      }

      let fetch_timeout = config.fetch_timeout;
      let engine = ChatCompletionsEngine::new(config)?;
      let request = OcrRequest { image_url, prompt };
      let analysis = analyze(&engine, &request, size.explicit(), fetch_timeout).await?;
      print_analysis(&analysis, json)?;
    }
    Commands::Keepalive {
      endpoint,
      interval_secs,
      duration_mins,
    } => {
      if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
      }
      let summary = hyocr_rs::keepalive::run(
        &config,
        Duration::from_secs(interval_secs.max(1)),
        Duration::from_secs(duration_mins.saturating_mul(60)),
      )
      .await?;
      println!(
        "{} of {} health checks succeeded",
        summary.successes, summary.attempts
      );
    }
  }

  Ok(())
}

#[tokio::main]
async fn main() {
  let args = Args::parse();
  init_tracing(args.quiet);

  if let Err(e) = run(args).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}
