use std::fs::{self, File};

use tracing::{debug, info};
use zip::result::ZipError;

use crate::context::PipelineContext;
use crate::error::ExtractError;

/// Extrait l'archive complète vers le dossier temporaire du contexte,
/// créé au besoin.
pub async fn run_extract(context: &PipelineContext) -> Result<(), ExtractError> {
    debug!("Début de l'extraction de {}", context.archive_path.display());

    fs::create_dir_all(&context.extract_dir)?;

    let archive_file = File::open(&context.archive_path)?;
    let mut archive = zip::ZipArchive::new(archive_file).map_err(|e| invalid(e, context))?;
    archive
        .extract(&context.extract_dir)
        .map_err(|e| invalid(e, context))?;

    info!("Archive extraite vers {}", context.extract_dir.display());
    Ok(())
}

fn invalid(error: ZipError, context: &PipelineContext) -> ExtractError {
    match error {
        ZipError::Io(e) => ExtractError::Io(e),
        _ => ExtractError::InvalidArchive(context.archive_path.display().to_string()),
    }
}
