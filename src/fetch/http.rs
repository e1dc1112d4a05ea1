//! HTTP fetcher
//!
//! Wraps a blocking reqwest client with retry support. `file://` URLs are
//! served straight from disk so local mirrors work without a server.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{self, Result};
use crate::fetch::{FetchedDocument, Fetcher};

/// Default timeout for HTTP requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum attempts for a request
const MAX_RETRIES: u32 = 3;

/// Base retry delay, multiplied by the attempt number
const RETRY_DELAY_MS: u64 = 1000;

/// Buffer size for streaming downloads
const STREAM_BUFFER_SIZE: usize = 8192;

/// Fetcher backed by HTTP(S) and the local file system
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
}

/// Local path of a `file://` URL, or `None` for any other scheme
fn file_url_path(url: &str) -> Option<PathBuf> {
    let parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "file" {
        return None;
    }
    parsed.to_file_path().ok()
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("sdkup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| error::fetch::failed("client", e))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Send a GET, retrying transport errors with a linear backoff
    ///
    /// HTTP error statuses are not retried.
    fn get_with_retry(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(error::fetch::failed(
                            url,
                            format!("HTTP {}", response.status()),
                        ));
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(error::fetch::failed(
                            url,
                            format!("{e} (after {attempt} attempts)"),
                        ));
                    }
                    warn!("Fetch attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(
                        RETRY_DELAY_MS * u64::from(attempt),
                    ));
                }
            }
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_document(&self, url: &str) -> Result<FetchedDocument> {
        info!("Fetching {}", url);

        let bytes = if let Some(path) = file_url_path(url) {
            fs::read(&path).map_err(|e| error::fetch::failed(url, e))?
        } else {
            self.get_with_retry(url)?
                .bytes()
                .map_err(|e| error::fetch::failed(url, e))?
                .to_vec()
        };

        let document = FetchedDocument::new(bytes);
        debug!(
            "Fetched {} bytes from {} (sha256 {})",
            document.bytes.len(),
            url,
            document.sha256
        );
        Ok(document)
    }

    fn download(&self, url: &str, dest: &Path, progress: Option<&ProgressBar>) -> Result<u64> {
        info!("Downloading {} to {}", url, dest.display());

        let mut file = File::create(dest).map_err(|e| error::fs::write_failed(dest, e))?;

        if let Some(path) = file_url_path(url) {
            let mut source = File::open(&path).map_err(|e| error::fetch::failed(url, e))?;
            let total = source.metadata().map(|m| m.len()).unwrap_or(0);
            return stream_to_file(&mut source, &mut file, dest, total, progress)
                .map_err(|e| error::fetch::failed(url, e));
        }

        let mut response = self.get_with_retry(url)?;
        let total = response.content_length().unwrap_or(0);
        stream_to_file(&mut response, &mut file, dest, total, progress)
            .map_err(|e| error::fetch::failed(url, e))
    }
}

/// Copy a reader to a file in chunks, never buffering the whole body
fn stream_to_file(
    reader: &mut impl Read,
    file: &mut File,
    dest: &Path,
    total_size: u64,
    progress: Option<&ProgressBar>,
) -> std::io::Result<u64> {
    if let Some(pb) = progress {
        if total_size > 0 {
            pb.set_length(total_size);
        }
    }

    let mut written: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])?;
        written += bytes_read as u64;

        if let Some(pb) = progress {
            pb.set_position(written);
        }
    }

    file.flush()?;
    debug!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}
