//! Dataset retrieval: locating the travel JSON, downloading or reading it, and
//! decoding it into a [`RawDataset`].

pub mod types;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

pub use types::RawDataset;

/// Location used when neither the CLI, the environment, nor a config file names one.
pub const DEFAULT_LOCATION: &str = "travel_recommendation_api.json";

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;
const MAX_RESPONSE_BYTES: usize = 10_000_000;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported dataset URL scheme '{0}': use http(s), file, or a local path")]
    UnsupportedScheme(String),

    #[error("invalid dataset URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid dataset path: {0}")]
    InvalidPath(String),

    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed: status {0}")]
    Status(u16),

    #[error("response too large (>{} bytes)", MAX_RESPONSE_BYTES)]
    TooLarge,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can produce the raw dataset once.
/// Implemented by [`Source`] for production; tests supply their own.
pub trait Retrieve {
    async fn retrieve(&self) -> Result<RawDataset, LoadError>;
}

pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Where the dataset lives.
#[derive(Debug, Clone)]
pub enum Source {
    Http { client: Client, url: String },
    File(PathBuf),
}

impl Source {
    /// Classify a location string. `http(s)://` is fetched over the network;
    /// `file://` URLs and plain paths are read from disk.
    pub fn resolve(location: &str, http: Client) -> Result<Self, LoadError> {
        match url::Url::parse(location) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => Ok(Source::Http {
                    client: http,
                    url: location.to_string(),
                }),
                "file" => parsed
                    .to_file_path()
                    .map(Source::File)
                    .map_err(|()| LoadError::InvalidPath(location.to_string())),
                // Windows drive letters parse as a single-letter scheme.
                scheme if scheme.len() == 1 => Ok(Source::File(PathBuf::from(location))),
                scheme => Err(LoadError::UnsupportedScheme(scheme.to_string())),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(Source::File(PathBuf::from(location)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http { url, .. } => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Retrieve for Source {
    async fn retrieve(&self) -> Result<RawDataset, LoadError> {
        let body = match self {
            Source::Http { client, url } => download(client, url).await?,
            Source::File(path) => tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?,
        };
        debug!(source = %self, bytes = body.len(), "dataset retrieved");
        parse_dataset(&body)
    }
}

/// Parse a response body. Invalid JSON is a load failure; valid JSON of an
/// unexpected shape is not.
pub fn parse_dataset(body: &[u8]) -> Result<RawDataset, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    Ok(RawDataset::from_value(value))
}

async fn download(client: &Client, url: &str) -> Result<Vec<u8>, LoadError> {
    let response = client
        .get(url)
        .header("User-Agent", crate::USER_AGENT)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    if let Some(len) = response.content_length()
        && len as usize > MAX_RESPONSE_BYTES
    {
        return Err(LoadError::TooLarge);
    }

    let mut body = Vec::new();
    let mut stream = response;
    while let Some(chunk) = stream.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(LoadError::TooLarge);
        }
    }
    Ok(body)
}
