use std::io;

use thiserror::Error;

/// Erreurs de l'étape d'extraction de l'archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0} n'est pas une archive zip valide")]
    InvalidArchive(String),

    #[error("Extraction impossible: {0}")]
    Io(#[from] io::Error),
}

/// Erreurs de la recherche des fichiers de données.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Fichier requis introuvable dans l'archive: {0}")]
    MissingDataFile(&'static str),
}

/// Erreurs de l'étape d'export CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    RecordFile(#[from] archive_twitter_data::RecordFileError),

    #[error(transparent)]
    CsvWrite(#[from] archive_twitter_data::CsvWriteError),
}

/// Erreurs de la passe d'analyse d'images. Elles sont confinées à cette
/// étape : le pipeline les journalise et garde ses autres sorties.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] archive_image_analysis::FetchError),

    #[error(transparent)]
    Enrich(#[from] archive_image_analysis::EnrichError),
}

/// Erreur principale du pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Erreur d'extraction : {0}")]
    Extract(#[from] ExtractError),

    #[error("Erreur de découverte : {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Erreur d'export : {0}")]
    Export(#[from] ExportError),
}
