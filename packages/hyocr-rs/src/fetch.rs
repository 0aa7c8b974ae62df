//! Bounded reads of an image's leading bytes, from a URL or a local file.
use hyocr_core::{sniff_dimensions, DimensionError, ImageDimensions, ImageFormat, MAX_SNIFF_BYTES};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("timed out after {0:?} reading image header")]
    Timeout(Duration),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Dimensions(#[from] DimensionError),
}

/// Where an image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Path(PathBuf),
}

impl ImageSource {
    /// `http://` and `https://` are URLs; everything else is a filesystem path.
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::Path(PathBuf::from(source))
        }
    }
}

/// Reads at most [`MAX_SNIFF_BYTES`] from `source`, giving up after `timeout`.
pub async fn fetch_header(source: &ImageSource, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let read = async {
        match source {
            ImageSource::Url(url) => fetch_url_prefix(url, timeout).await,
            ImageSource::Path(path) => read_file_prefix(path).await,
        }
    };
    tokio::time::timeout(timeout, read)
        .await
        .map_err(|_| FetchError::Timeout(timeout))?
}

async fn fetch_url_prefix(url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(request_error)?;
    let mut response = client.get(url).send().await.map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut buf = Vec::with_capacity(MAX_SNIFF_BYTES);
    while buf.len() < MAX_SNIFF_BYTES {
        match response.chunk().await.map_err(request_error)? {
            Some(chunk) => buf.extend_from_slice(&chunk),
            None => break,
        }
    }
    buf.truncate(MAX_SNIFF_BYTES);

    tracing::debug!(url, bytes = buf.len(), "fetched image header");
    Ok(buf)
}

async fn read_file_prefix(path: &Path) -> Result<Vec<u8>, FetchError> {
    let io_error = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let mut buf = Vec::with_capacity(MAX_SNIFF_BYTES);
    file.take(MAX_SNIFF_BYTES as u64)
        .read_to_end(&mut buf)
        .await
        .map_err(io_error)?;
    Ok(buf)
}

/// Fetches the header of `source` and sniffs its dimensions.
pub async fn probe_dimensions(
    source: &ImageSource,
    timeout: Duration,
) -> Result<(ImageFormat, ImageDimensions), FetchError> {
    let header = fetch_header(source, timeout).await?;
    Ok(sniff_dimensions(&header)?)
}
