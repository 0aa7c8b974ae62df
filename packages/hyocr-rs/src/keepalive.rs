//! Periodically pings the OCR service so a scale-to-zero host stays warm.
use chrono::{Local, TimeDelta};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::config::OcrConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAliveSummary {
    pub attempts: u32,
    pub successes: u32,
}

/// Polls `GET {endpoint}/models` every `interval` until `duration` has elapsed.
///
/// Failed polls are logged and counted; they never stop the loop.
pub async fn run(
    config: &OcrConfig,
    interval: Duration,
    duration: Duration,
) -> anyhow::Result<KeepAliveSummary> {
    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.fetch_timeout)
        .build()?;
    let url = format!("{}/models", config.base_url());

    let deadline = Instant::now() + duration;
    if let Ok(delta) = TimeDelta::from_std(duration) {
        tracing::info!(%url, until = %(Local::now() + delta).format("%H:%M:%S"), "keep-alive started");
    }

    let mut summary = KeepAliveSummary {
        attempts: 0,
        successes: 0,
    };

    loop {
        summary.attempts += 1;
        let started = Instant::now();
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                summary.successes += 1;
                tracing::info!(
                    attempt = summary.attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "service is up"
                );
            }
            Ok(resp) => {
                tracing::warn!(attempt = summary.attempts, status = resp.status().as_u16(), "health check failed");
            }
            Err(e) => {
                tracing::warn!(attempt = summary.attempts, error = %e, "health check failed");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        sleep(interval.min(deadline - now)).await;
        if Instant::now() >= deadline {
            break;
        }
    }

    tracing::info!(
        attempts = summary.attempts,
        successes = summary.successes,
        "keep-alive finished"
    );
    Ok(summary)
}
