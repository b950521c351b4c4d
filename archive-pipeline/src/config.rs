/// Sous-dossier temporaire d'extraction de l'archive.
pub const TEMP_EXTRACT_DIR: &str = "temp_extract";

/// Nom du CSV de la première passe.
pub const CSV_FILE: &str = "tweets_data.csv";

/// Nom du CSV enrichi par l'analyse d'images.
pub const ENRICHED_CSV_FILE: &str = "tweets_data_with_image_analysis.csv";

/// Noms candidats (en minuscules) du fichier source des tweets.
pub const TWEET_FILENAMES: &[&str] = &["tweet.js", "tweets.js"];

/// Nom (en minuscules) du fichier source des likes.
pub const LIKE_FILENAME: &str = "like.js";
