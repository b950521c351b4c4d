use tracing::{error, info};

pub use context::PipelineContext;
pub use error::PipelineError;

pub mod config;
pub mod context;
pub mod error;
pub mod steps;

use archive_image_analysis::ImageClassifier;

use crate::steps::{
    analyze::run_analysis, cleanup::run_cleanup, discover::run_discovery, export::run_export,
    extract::run_extract,
};

/// Orchestre toutes les étapes : extraction de l'archive, recherche des
/// sources, export CSV, analyse d'images, nettoyage. La capacité de
/// classification est fournie par l'appelant ; sans elle, la passe
/// d'enrichissement est sautée. Un échec de cette passe est journalisé et
/// laisse les autres sorties en place.
pub async fn run(
    context: &PipelineContext,
    classifier: Option<&dyn ImageClassifier>,
) -> Result<(), PipelineError> {
    info!("Traitement de l'archive {}", context.archive_path.display());

    info!("Étape 1/4: Extraction de l'archive");
    run_extract(context).await?;

    info!("Étape 2/4: Recherche des fichiers de données");
    let files = match run_discovery(context).await {
        Ok(files) => files,
        Err(e) => {
            // archive inexploitable : on nettoie avant de remonter l'erreur
            run_cleanup(context).await;
            return Err(e.into());
        }
    };

    info!("Étape 3/4: Export des tweets");
    let rows = run_export(context, &files).await?;
    info!("{} lignes écrites", rows);

    if let Some(classifier) = classifier {
        info!("Étape 4/4: Analyse des images");
        if let Err(e) = run_analysis(context, classifier).await {
            error!("Analyse des images abandonnée: {}", e);
        }
    }

    run_cleanup(context).await;

    info!("Traitement de l'archive terminé");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;

    use async_trait::async_trait;
    use zip::write::FileOptions;

    use archive_image_analysis::ClassifyError;

    use super::*;

    const TWEETS_JS: &str = r#"window.YTD.tweets.part0 = [
      {"tweet": {"id_str": "123", "user_id_str": "42", "full_text": "bonjour",
                 "created_at": "Wed Oct 05 20:35:00 +0000 2021"}}
    ];"#;

    const LIKE_JS: &str = r#"window.YTD.like.part0 = [
      {"like": {"tweetId": "123"}},
      {"like": {"tweetId": "123"}}
    ];"#;

    struct StubClassifier;

    #[async_trait]
    impl ImageClassifier for StubClassifier {
        async fn classify(&self, _: &[u8], _: &[&str]) -> Result<Vec<f64>, ClassifyError> {
            Ok(vec![1.0, 0.0, 0.0, 0.0])
        }
    }

    fn write_archive(path: &std::path::Path) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default();
        zip.start_file("data/tweets.js", options).unwrap();
        zip.write_all(TWEETS_JS.as_bytes()).unwrap();
        zip.start_file("data/like.js", options).unwrap();
        zip.write_all(LIKE_JS.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn test_full_run_without_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("twitter-archive.zip");
        write_archive(&archive_path);

        let context = PipelineContext::new(&archive_path, dir.path().join("output"));
        fs::create_dir_all(&context.output_dir).unwrap();
        run(&context, None).await.unwrap();

        let content = fs::read_to_string(&context.csv_path).unwrap();
        assert!(content.starts_with("tweet_id,"));
        assert!(content.contains("123"));
        assert!(content.contains("2021-10-05 20:35:00"));
        // le dossier temporaire a été nettoyé, pas de CSV enrichi
        assert!(!context.extract_dir.exists());
        assert!(!context.enriched_csv_path.exists());
    }

    #[tokio::test]
    async fn test_full_run_with_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("twitter-archive.zip");
        write_archive(&archive_path);

        let context = PipelineContext::new(&archive_path, dir.path().join("output"));
        fs::create_dir_all(&context.output_dir).unwrap();
        run(&context, Some(&StubClassifier)).await.unwrap();

        // aucun média dans l'archive : CSV enrichi aux valeurs par défaut
        let mut reader = csv::Reader::from_path(&context.enriched_csv_path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers.last().map(String::as_str), Some("Probability"));
        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(headers.len() - 2), Some(""));
        assert_eq!(rows[0].get(headers.len() - 1), Some("0.0"));
    }

    #[tokio::test]
    async fn test_missing_data_files_abort_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("twitter-archive.zip");
        let file = fs::File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("data/account.js", FileOptions::default())
            .unwrap();
        zip.write_all(b"window.YTD.account.part0 = []").unwrap();
        zip.finish().unwrap();

        let context = PipelineContext::new(&archive_path, dir.path().join("output"));
        fs::create_dir_all(&context.output_dir).unwrap();
        let result = run(&context, None).await;

        assert!(matches!(result, Err(PipelineError::Discovery(_))));
        assert!(!context.csv_path.exists());
        // le dossier temporaire est nettoyé même en cas d'abandon
        assert!(!context.extract_dir.exists());
    }
}
