//! Detecting the encoding of a remote resource.
//!
//! The response body is streamed into a [`Detector`] chunk by chunk, so at
//! most one chunk is held in memory and the download stops as soon as a
//! strategy confirms.

use std::time::Duration;
use thiserror::Error;

use crate::detection::Detection;
use crate::detector::Detector;
use crate::error::SnifferError;
use crate::sample::DEFAULT_CHUNK_SIZE;

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching a URL.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for HttpError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => HttpError::HttpStatus {
                status: code,
                message: format!("Server returned status {code}"),
            },
            _ => HttpError::Network(err.to_string()),
        }
    }
}

impl From<SnifferError> for HttpError {
    fn from(err: SnifferError) -> Self {
        match err {
            SnifferError::Io(e) => HttpError::Io(e),
            other => HttpError::Network(other.to_string()),
        }
    }
}

impl From<HttpError> for SnifferError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Io(e) => SnifferError::Io(e),
            other => SnifferError::Http(other.to_string()),
        }
    }
}

/// Fetch `url` and detect the encoding of its body.
///
/// If `max_bytes` is `Some(n)`, only the first `n` bytes are considered and
/// a Range request asks the server not to send more. Servers that ignore
/// Range are cut off after `n` bytes anyway.
pub fn fetch_and_detect(url: &str, max_bytes: Option<usize>) -> Result<Option<Detection>, HttpError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(HttpError::InvalidUrl(format!(
            "URL must start with http:// or https://: {url}"
        )));
    }

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(DEFAULT_TIMEOUT))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let response = match max_bytes {
        Some(0) => return Ok(None),
        Some(bytes) => {
            let range_header = format!("bytes=0-{}", bytes - 1);
            match agent.get(url).header("Range", &range_header).call() {
                // Range Not Satisfiable: the resource is empty or smaller than asked
                Err(ureq::Error::StatusCode(416)) => agent.get(url).call()?,
                other => other?,
            }
        }
        None => agent.get(url).call()?,
    };
    log::debug!("GET {url}: {}", response.status());

    let reader = response.into_body().into_reader();
    let mut detector = Detector::new();
    let fed = detector.feed_reader(reader, DEFAULT_CHUNK_SIZE, max_bytes)?;
    log::debug!("fed {fed} bytes from {url}");
    detector.finish();
    Ok(detector.detection().copied())
}
