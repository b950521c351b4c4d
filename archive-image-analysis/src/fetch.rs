use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Délai maximal de récupération d'une image.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Client HTTP inutilisable: {0}")]
    Client(String),

    #[error("Téléchargement impossible de {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Téléchargement de {url} refusé: HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Récupération des octets d'un média ; les tests substituent une
/// implémentation sans réseau.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
