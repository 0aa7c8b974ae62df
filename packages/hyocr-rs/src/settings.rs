//! Remembers the last image URL and prompt between runs in a small JSON file.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

pub const DEFAULT_SETTINGS_FILE: &str = "ocr_settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("failed to read settings file {path}: {source}")]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to write settings file {path}: {source}")]
  Write {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to encode settings: {0}")]
  Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prompt: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl Settings {
  /// Loads settings from `path`.
  ///
  /// A missing file yields defaults. A file that is not valid JSON also yields
  /// defaults, with a warning, so a hand-edited file never blocks a run.
  pub async fn load(path: &Path) -> Result<Self, SettingsError> {
    let content = match fs::read_to_string(path).await {
      Ok(c) => c,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(SettingsError::Read {
          path: path.to_path_buf(),
          source,
        })
      }
    };

    match serde_json::from_str(&content) {
      Ok(settings) => Ok(settings),
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
        Ok(Self::default())
      }
    }
  }

  /// Writes pretty JSON to `path`, stamping `updated_at`.
  pub async fn save(&mut self, path: &Path) -> Result<(), SettingsError> {
    self.updated_at = Some(Utc::now());
    let json = serde_json::to_string_pretty(self)?;
    fs::write(path, json)
      .await
      .map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
      })?;
    tracing::debug!(path = %path.display(), "saved settings");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.json")).await.unwrap();
    assert_eq!(settings, Settings::default());
  }

  #[tokio::test]
  async fn test_round_trip_keeps_unicode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_SETTINGS_FILE);

    let mut settings = Settings {
      image_url: Some("https://example.com/書.jpg".into()),
      prompt: Some("识别文字".into()),
      updated_at: None,
    };
    settings.save(&path).await.unwrap();
    assert!(settings.updated_at.is_some());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("识别文字"));

    let loaded = Settings::load(&path).await.unwrap();
    assert_eq!(loaded, settings);
  }

  #[tokio::test]
  async fn test_corrupt_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_SETTINGS_FILE);
    std::fs::write(&path, "{not json").unwrap();
    let settings = Settings::load(&path).await.unwrap();
    assert_eq!(settings, Settings::default());
  }
}
