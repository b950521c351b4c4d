use std::{io, path::Path};

use crate::normalize::TweetRecord;

#[derive(Debug, thiserror::Error)]
pub enum CsvWriteError {
  #[error("Écriture du CSV impossible: {0}")]
  Csv(#[from] csv::Error),
  #[error("Écriture du CSV impossible: {0}")]
  Io(#[from] io::Error),
}

/// Sérialise les lignes vers `path` : la ligne d'en-tête (écrite même sans
/// enregistrement) puis une ligne par enregistrement, dans l'ordre reçu.
pub fn write_records<P: AsRef<Path>>(
  path: P,
  records: &[TweetRecord],
) -> Result<(), CsvWriteError> {
  let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
  writer.write_record(CSV_HEADERS)?;
  for record in records {
    writer.serialize(record)?;
  }
  writer.flush()?;
  Ok(())
}

/// Ordre contractuel des colonnes du premier CSV.
pub const CSV_HEADERS: [&str; 13] = [
  "tweet_id",
  "in_reply_to_status_id",
  "in_reply_to_user_id",
  "in_reply_to_status_username",
  "timestamp",
  "source",
  "text",
  "expanded_urls",
  "tweet_url",
  "retweet_count",
  "favorite_count",
  "like_count",
  "media_url",
];

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn record(id: &str, text: &str) -> TweetRecord {
    TweetRecord {
      tweet_id: id.to_string(),
      in_reply_to_status_id: String::new(),
      in_reply_to_user_id: String::new(),
      in_reply_to_status_username: String::new(),
      timestamp: "2021-10-05 20:35:00".to_string(),
      source: "Twitter Web App".to_string(),
      text: text.to_string(),
      expanded_urls: String::new(),
      tweet_url: format!("https://twitter.com/42/status/{}", id),
      retweet_count: 1,
      favorite_count: 2,
      like_count: 3,
      media_url: String::new(),
    }
  }

  #[test]
  fn test_header_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.csv");
    write_records(&path, &[record("1", "coucou")]).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
    assert_eq!(headers, CSV_HEADERS);
  }

  #[test]
  fn test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.csv");
    let records = vec![record("1", "texte, avec virgule"), record("2", "\"cité\"")];
    write_records(&path, &records).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let read_back: Vec<TweetRecord> = reader
      .deserialize()
      .collect::<Result<Vec<_>, _>>()
      .unwrap();
    assert_eq!(read_back, records);
  }

  #[test]
  fn test_idempotent_output() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.csv");
    let second = dir.path().join("b.csv");
    let records = vec![record("1", "un"), record("2", "deux")];

    write_records(&first, &records).unwrap();
    write_records(&second, &records).unwrap();

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
  }
}
