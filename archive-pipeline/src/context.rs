use std::path::PathBuf;

use crate::config::{CSV_FILE, ENRICHED_CSV_FILE, TEMP_EXTRACT_DIR};

/// Contexte partagé entre les étapes du pipeline.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub archive_path: PathBuf,
    pub output_dir: PathBuf,
    pub extract_dir: PathBuf,
    pub csv_path: PathBuf,
    pub enriched_csv_path: PathBuf,
}

impl PipelineContext {
    pub fn new<A, O>(archive_path: A, output_dir: O) -> Self
    where
        A: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        let archive_path = archive_path.into();
        let output_dir = output_dir.into();
        Self {
            extract_dir: output_dir.join(TEMP_EXTRACT_DIR),
            csv_path: output_dir.join(CSV_FILE),
            enriched_csv_path: output_dir.join(ENRICHED_CSV_FILE),
            archive_path,
            output_dir,
        }
    }
}
