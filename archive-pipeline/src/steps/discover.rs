use std::path::PathBuf;

use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::{LIKE_FILENAME, TWEET_FILENAMES};
use crate::context::PipelineContext;
use crate::error::DiscoveryError;

/// Chemins des deux sources trouvées dans l'archive extraite.
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub tweets_file: PathBuf,
    pub likes_file: PathBuf,
}

/// Parcourt le dossier d'extraction (profondeur libre, entrées triées par
/// nom : la sélection est déterministe même avec plusieurs candidats) à la
/// recherche de `tweet.js`/`tweets.js` et `like.js`, sans tenir compte de
/// la casse. La première occurrence de chaque sorte l'emporte.
pub async fn run_discovery(context: &PipelineContext) -> Result<DataFiles, DiscoveryError> {
    debug!(
        "Recherche des fichiers de données dans {}",
        context.extract_dir.display()
    );

    let mut tweets_file = None;
    let mut likes_file = None;

    for entry in WalkDir::new(&context.extract_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if tweets_file.is_none() && TWEET_FILENAMES.contains(&name.as_str()) {
            info!("Fichier des tweets: {}", entry.path().display());
            tweets_file = Some(entry.path().to_path_buf());
        } else if likes_file.is_none() && name == LIKE_FILENAME {
            info!("Fichier des likes: {}", entry.path().display());
            likes_file = Some(entry.path().to_path_buf());
        }
    }

    if tweets_file.is_none() {
        error!("Fichier tweet.js introuvable dans l'archive");
    }
    if likes_file.is_none() {
        error!("Fichier like.js introuvable dans l'archive");
    }

    match (tweets_file, likes_file) {
        (Some(tweets_file), Some(likes_file)) => Ok(DataFiles {
            tweets_file,
            likes_file,
        }),
        (None, _) => Err(DiscoveryError::MissingDataFile("tweet.js")),
        (_, None) => Err(DiscoveryError::MissingDataFile("like.js")),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn context(dir: &std::path::Path) -> PipelineContext {
        PipelineContext::new(dir.join("archive.zip"), dir.to_path_buf())
    }

    #[tokio::test]
    async fn test_finds_nested_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());
        fs::create_dir_all(context.extract_dir.join("data/sous-dossier")).unwrap();
        fs::write(context.extract_dir.join("data/Tweets.js"), "").unwrap();
        fs::write(context.extract_dir.join("data/sous-dossier/LIKE.JS"), "").unwrap();

        let files = run_discovery(&context).await.unwrap();
        assert!(files.tweets_file.ends_with("data/Tweets.js"));
        assert!(files.likes_file.ends_with("data/sous-dossier/LIKE.JS"));
    }

    #[tokio::test]
    async fn test_first_candidate_in_sorted_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());
        fs::create_dir_all(context.extract_dir.join("a")).unwrap();
        fs::create_dir_all(context.extract_dir.join("b")).unwrap();
        fs::write(context.extract_dir.join("a/tweet.js"), "").unwrap();
        fs::write(context.extract_dir.join("b/tweets.js"), "").unwrap();
        fs::write(context.extract_dir.join("like.js"), "").unwrap();

        let files = run_discovery(&context).await.unwrap();
        assert!(files.tweets_file.ends_with("a/tweet.js"));
    }

    #[tokio::test]
    async fn test_missing_likes_file() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());
        fs::create_dir_all(&context.extract_dir).unwrap();
        fs::write(context.extract_dir.join("tweets.js"), "").unwrap();

        let result = run_discovery(&context).await;
        assert!(matches!(
            result,
            Err(DiscoveryError::MissingDataFile("like.js"))
        ));
    }
}
