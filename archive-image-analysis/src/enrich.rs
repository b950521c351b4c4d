use std::path::Path;

use thiserror::Error;

use crate::classifier::{ClassifyError, ImageClassifier, CATEGORIES};
use crate::fetch::{FetchError, MediaFetcher};

pub const IMAGE_CATEGORY_HEADER: &str = "Image Category";
pub const PROBABILITY_HEADER: &str = "Probability";
const MEDIA_URL_HEADER: &str = "media_url";

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("CSV illisible ou inscriptible: {0}")]
    Csv(#[from] csv::Error),

    #[error("Colonne {} absente du CSV source", MEDIA_URL_HEADER)]
    MissingMediaColumn,

    #[error("Écriture du CSV enrichi impossible: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    /// lignes portant au moins une URL de média
    pub with_media: usize,
    /// lignes effectivement classées
    pub classified: usize,
}

#[derive(Debug, Error)]
enum RowError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("décodage impossible: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("distribution de probabilités vide")]
    EmptyDistribution,
}

/// Relit le CSV d'extraction, classe la première image de chaque ligne qui
/// en porte une et écrit le CSV enrichi (le CSV source n'est jamais
/// réécrit). Un échec ligne à ligne (téléchargement, décodage ou
/// inférence) laisse `Image Category`/`Probability` à leurs valeurs par
/// défaut et n'arrête jamais la passe.
pub async fn enrich_csv(
    input: &Path,
    output: &Path,
    fetcher: &dyn MediaFetcher,
    classifier: &dyn ImageClassifier,
) -> Result<EnrichReport, EnrichError> {
    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?.clone();
    let media_column = headers
        .iter()
        .position(|h| h == MEDIA_URL_HEADER)
        .ok_or(EnrichError::MissingMediaColumn)?;

    let mut writer = csv::Writer::from_path(output)?;
    let mut enriched_headers = headers.clone();
    enriched_headers.push_field(IMAGE_CATEGORY_HEADER);
    enriched_headers.push_field(PROBABILITY_HEADER);
    writer.write_record(&enriched_headers)?;

    let mut report = EnrichReport::default();
    for row in reader.records() {
        let row = row?;

        let mut category = "";
        let mut probability = 0.0;
        if let Some(url) = first_candidate(row.get(media_column).unwrap_or_default()) {
            report.with_media += 1;
            tracing::debug!("Classification de l'image {}", url);
            match classify_url(url, fetcher, classifier).await {
                Ok((index, score)) => {
                    category = CATEGORIES[index];
                    probability = score;
                    report.classified += 1;
                }
                Err(e) => tracing::warn!("Image {} ignorée: {}", url, e),
            }
        }

        let mut enriched = row.clone();
        enriched.push_field(category);
        enriched.push_field(&format!("{:?}", probability));
        writer.write_record(&enriched)?;
    }
    writer.flush()?;

    tracing::info!("{}/{} images classées", report.classified, report.with_media);
    Ok(report)
}

async fn classify_url(
    url: &str,
    fetcher: &dyn MediaFetcher,
    classifier: &dyn ImageClassifier,
) -> Result<(usize, f64), RowError> {
    let bytes = fetcher.fetch(url).await?;
    // les octets doivent décoder une image avant d'atteindre le modèle
    image::load_from_memory(&bytes)?;
    let probabilities = classifier.classify(&bytes, &CATEGORIES).await?;
    best_label(&probabilities).ok_or(RowError::EmptyDistribution)
}

/// Première URL d'une liste séparée par des virgules, si elle existe.
pub fn first_candidate(media_urls: &str) -> Option<&str> {
    let first = media_urls.split(',').next()?.trim();
    (!first.is_empty()).then_some(first)
}

/// Indice et probabilité de l'étiquette dominante ; à égalité, la première
/// dans l'ordre des étiquettes l'emporte.
pub fn best_label(probabilities: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &p) in probabilities.iter().enumerate() {
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((index, p)),
        }
    }
    best
}
