//! Companion desktop app bridge
//!
//! The desktop app that downloads assets serves a local HTTP endpoint
//! reporting where its library lives. Hosts use it to fill in the library
//! path when none is configured. One request, no retry.
//!
//! ```rust,ignore
//! use msx_bridge::BridgeClient;
//!
//! let folder = BridgeClient::new(msx_bridge::DEFAULT_BRIDGE_URL, 5)?
//!     .library_folder()
//!     .await?;
//! ```

use msx_library::BridgeConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub use msx_library::DEFAULT_BRIDGE_URL;

/// Failures talking to the companion app
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Nothing is listening; the app is most likely not running
    #[error("companion app not reachable at {0}")]
    Connect(String),

    /// The app did not answer in time
    #[error("companion app at {url} did not answer within {secs}s")]
    Timeout {
        /// Endpoint queried
        url: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// Non-success HTTP status
    #[error("companion app answered with status {0}")]
    Status(u16),

    /// Body is not `{"folder": "..."}`
    #[error("unexpected response from companion app: {0}")]
    Decode(String),

    /// Any other transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct FolderResponse {
    folder: String,
}

/// Client for the library-folder endpoint
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    url: String,
    timeout_secs: u64,
}

impl BridgeClient {
    /// Client for `url` with a request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, BridgeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            timeout_secs,
        })
    }

    /// Client from the `[bridge]` config section
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        Self::new(config.url.clone(), config.timeout_secs)
    }

    /// Endpoint queried
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the app for its library root
    ///
    /// # Errors
    /// See [`BridgeError`]
    pub async fn library_folder(&self) -> Result<PathBuf, BridgeError> {
        tracing::debug!("Requesting library folder from {}", self.url);
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: FolderResponse =
            serde_json::from_str(&body).map_err(|e| BridgeError::Decode(e.to_string()))?;
        if parsed.folder.trim().is_empty() {
            return Err(BridgeError::Decode("empty folder".to_string()));
        }

        tracing::info!("Companion app reports library at {}", parsed.folder);
        Ok(PathBuf::from(parsed.folder))
    }

    fn classify(&self, err: reqwest::Error) -> BridgeError {
        if err.is_timeout() {
            BridgeError::Timeout {
                url: self.url.clone(),
                secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            BridgeError::Connect(self.url.clone())
        } else {
            BridgeError::Http(err)
        }
    }
}
