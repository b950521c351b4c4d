use tracing::{debug, info};

use archive_image_analysis::{enrich_csv, HttpFetcher, ImageClassifier};

use crate::context::PipelineContext;
use crate::error::AnalysisError;

/// Passe d'enrichissement : relit le premier CSV et écrit le CSV enrichi à
/// l'aide de la capacité de classification reçue. Le CSV source n'est
/// jamais réécrit.
pub async fn run_analysis(
    context: &PipelineContext,
    classifier: &dyn ImageClassifier,
) -> Result<(), AnalysisError> {
    debug!("Début de l'analyse des images");

    let fetcher = HttpFetcher::new()?;
    let report = enrich_csv(
        &context.csv_path,
        &context.enriched_csv_path,
        &fetcher,
        classifier,
    )
    .await?;

    info!(
        "CSV enrichi écrit vers {} ({}/{} images classées)",
        context.enriched_csv_path.display(),
        report.classified,
        report.with_media
    );
    Ok(())
}
