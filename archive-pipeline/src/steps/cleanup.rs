use std::fs;

use tracing::{debug, info, warn};

use crate::context::PipelineContext;

/// Supprime le dossier temporaire d'extraction ; un échec est signalé mais
/// ne fait jamais échouer le traitement.
pub async fn run_cleanup(context: &PipelineContext) {
    debug!(
        "Suppression du dossier temporaire {}",
        context.extract_dir.display()
    );

    match fs::remove_dir_all(&context.extract_dir) {
        Ok(()) => info!(
            "Dossier temporaire {} supprimé",
            context.extract_dir.display()
        ),
        Err(e) => warn!(
            "Dossier {} non supprimé: {}",
            context.extract_dir.display(),
            e
        ),
    }
}
