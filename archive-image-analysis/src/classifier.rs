use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

/// Étiquettes fixes de classification, dans l'ordre du vecteur de
/// probabilités.
pub const CATEGORIES: [&str; 4] = ["meme", "infographic", "book recommendation", "promotion"];

const INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const CLIP_MODEL: &str = "openai/clip-vit-large-patch14";
const INFERENCE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Modèle indisponible: {0}")]
    ModelUnavailable(String),

    #[error("Erreur réseau: {0}")]
    Network(String),

    #[error("Réponse du modèle illisible: {0}")]
    BadResponse(String),
}

/// Capacité de classification : pour une image et une liste d'étiquettes,
/// un vecteur de probabilités aligné sur ces étiquettes (somme 1).
///
/// Les tests substituent une implémentation déterministe ; le pipeline ne
/// dépend jamais du client réseau concret.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8], labels: &[&str]) -> Result<Vec<f64>, ClassifyError>;
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Client du point d'inférence hébergé pour CLIP : classification
/// zéro-shot d'une image contre des étiquettes candidates.
pub struct ClipClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl ClipClient {
    /// Construit le client et sonde le point d'inférence du modèle
    /// pré-entraîné ; un modèle injoignable est signalé dès ici, avant de
    /// toucher à la moindre ligne.
    pub async fn load() -> Result<Self, ClassifyError> {
        Self::load_from(INFERENCE_BASE_URL, CLIP_MODEL).await
    }

    pub async fn load_from(base_url: &str, model: &str) -> Result<Self, ClassifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(INFERENCE_TIMEOUT)
            .build()
            .map_err(|e| ClassifyError::Network(e.to_string()))?;
        let endpoint = format!("{}/{}", base_url, model);

        let status = http_client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ClassifyError::ModelUnavailable(e.to_string()))?
            .status();
        // 503 = modèle en cours de chargement côté service, il répondra
        if !status.is_success() && status.as_u16() != 503 {
            return Err(ClassifyError::ModelUnavailable(format!(
                "{} a répondu {}",
                endpoint, status
            )));
        }

        tracing::info!("Modèle {} prêt", model);
        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

#[async_trait]
impl ImageClassifier for ClipClient {
    async fn classify(&self, image: &[u8], labels: &[&str]) -> Result<Vec<f64>, ClassifyError> {
        let body = serde_json::json!({
            "inputs": {
                "image": base64::engine::general_purpose::STANDARD.encode(image),
            },
            "parameters": {
                "candidate_labels": labels,
            },
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Network(format!("HTTP {}", status)));
        }

        let scores: Vec<LabelScore> = response
            .json()
            .await
            .map_err(|e| ClassifyError::BadResponse(e.to_string()))?;

        // réaligne la réponse (triée par score) sur l'ordre des étiquettes
        labels
            .iter()
            .map(|label| {
                scores
                    .iter()
                    .find(|s| s.label == *label)
                    .map(|s| s.score)
                    .ok_or_else(|| {
                        ClassifyError::BadResponse(format!("étiquette absente: {}", label))
                    })
            })
            .collect()
    }
}
