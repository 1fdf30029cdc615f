//! Retrieval of sprite index text.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::manifest::normalize_sprite_url;

/// Capability to fetch the text body of a sprite index.
pub trait ManifestSource {
    fn fetch_index(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches indexes over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    client: reqwest::Client,
}

impl HttpManifestSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("mosaic-preview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ManifestSource for HttpManifestSource {
    async fn fetch_index(&self, url: &str) -> Result<String, FetchError> {
        let url = normalize_sprite_url(url);
        debug!(url = %url, "fetching sprite index");
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "sprite index request failed");
            FetchError::Transport(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "sprite index unavailable");
            return Err(FetchError::Status(status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

/// Canned responses keyed by URL, for tests and offline runs.
///
/// Unknown URLs answer with status 404.
#[derive(Debug, Default)]
pub struct StaticManifestSource {
    entries: HashMap<String, Result<String, FetchError>>,
    requested: Mutex<Vec<String>>,
}

impl StaticManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.entries.insert(url.into(), Ok(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.entries.insert(url.into(), Err(FetchError::Status(status)));
        self
    }

    pub fn with_transport_error(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.entries
            .insert(url.into(), Err(FetchError::Transport(message.into())));
        self
    }

    /// URLs fetched so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ManifestSource for StaticManifestSource {
    async fn fetch_index(&self, url: &str) -> Result<String, FetchError> {
        let url = normalize_sprite_url(url);
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());
        self.entries
            .get(&url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}
