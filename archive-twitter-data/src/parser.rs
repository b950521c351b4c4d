use std::{fs, io, path::Path};

use regex::Regex;
use serde::de::DeserializeOwned;

/// Espace de noms de la déclaration JavaScript des fichiers de l'export.
const NAMESPACE: &str = "YTD";

#[derive(Debug, thiserror::Error)]
pub enum RecordFileError {
  #[error("Lecture impossible de {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: io::Error,
  },
  #[error("Données invalides dans {path}: {source}")]
  Malformed {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

/// Lit un fichier de l'export, retire l'enrobage
/// `window.YTD.<prefix>.part0 = ` et le `;` final éventuel, puis parse le
/// tableau JSON restant.
pub fn parse_export_file<T, P>(path: P, prefix: &str) -> Result<Vec<T>, RecordFileError>
where
  T: DeserializeOwned,
  P: AsRef<Path>,
{
  let path = path.as_ref();
  let content = fs::read_to_string(path).map_err(|source| RecordFileError::Io {
    path: path.display().to_string(),
    source,
  })?;

  serde_json::from_str(strip_declaration(&content, prefix)).map_err(|source| {
    RecordFileError::Malformed {
      path: path.display().to_string(),
      source,
    }
  })
}

fn strip_declaration<'a>(content: &'a str, prefix: &str) -> &'a str {
  let declaration = Regex::new(&format!(
    r"^window\.{}\.{}\.part0\s*=\s*",
    NAMESPACE,
    regex::escape(prefix)
  ))
  .unwrap();

  let rest = match declaration.find(content) {
    Some(m) => &content[m.end()..],
    None => content,
  };
  let rest = rest.trim_end();
  rest.strip_suffix(';').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;
  use crate::model::{LikeEnvelope, TweetEnvelope};

  #[test]
  fn strips_declaration_and_terminator() {
    let content = "window.YTD.tweets.part0 = [1, 2];";
    assert_eq!(strip_declaration(content, "tweets"), "[1, 2]");
  }

  #[test]
  fn tolerates_spacing_around_equals() {
    assert_eq!(strip_declaration("window.YTD.like.part0=[]", "like"), "[]");
    assert_eq!(
      strip_declaration("window.YTD.like.part0   =   []\n", "like"),
      "[]"
    );
  }

  #[test]
  fn leaves_bare_json_untouched() {
    assert_eq!(strip_declaration("[{\"a\": 1}]", "tweets"), "[{\"a\": 1}]");
  }

  #[test]
  fn parses_tweet_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      "window.YTD.tweets.part0 = [{{\"tweet\": {{\"id_str\": \"123\"}}}}];"
    )
    .unwrap();

    let tweets: Vec<TweetEnvelope> = parse_export_file(file.path(), "tweets").unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].tweet.id_str, "123");
  }

  #[test]
  fn parses_like_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      "window.YTD.like.part0 = [{{\"like\": {{\"tweetId\": \"123\"}}}}]"
    )
    .unwrap();

    let likes: Vec<LikeEnvelope> = parse_export_file(file.path(), "like").unwrap();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0].like.tweet_id.as_deref(), Some("123"));
  }

  #[test]
  fn malformed_content_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "window.YTD.tweets.part0 = pas du json").unwrap();

    let result: Result<Vec<TweetEnvelope>, _> = parse_export_file(file.path(), "tweets");
    assert!(matches!(result, Err(RecordFileError::Malformed { .. })));
  }

  #[test]
  fn missing_file_is_an_io_error() {
    let result: Result<Vec<TweetEnvelope>, _> =
      parse_export_file("/nulle/part/tweets.js", "tweets");
    assert!(matches!(result, Err(RecordFileError::Io { .. })));
  }
}
