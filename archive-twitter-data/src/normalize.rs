use std::collections::HashMap;

use chrono::DateTime;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{LikeEnvelope, RawTweet, TweetEnvelope};

/// Horodatage de l'export : `Wed Oct 05 20:35:00 +0000 2021`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
/// Horodatage de sortie : `2021-10-05 20:35:00`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ligne aplatie du CSV de sortie. L'ordre des champs est celui des
/// colonnes écrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetRecord {
  pub tweet_id: String,
  pub in_reply_to_status_id: String,
  pub in_reply_to_user_id: String,
  pub in_reply_to_status_username: String,
  pub timestamp: String,
  pub source: String,
  pub text: String,
  pub expanded_urls: String,
  pub tweet_url: String,
  pub retweet_count: u64,
  pub favorite_count: u64,
  pub like_count: u64,
  pub media_url: String,
}

/// Table des tweets indexée par identifiant. Un identifiant en double
/// remplace l'enregistrement précédent sans changer sa position
/// d'insertion : le dernier écrit gagne, l'ordre de parcours reste celui
/// de la première insertion.
#[derive(Debug, Default)]
pub struct TweetTable {
  ids: Vec<String>,
  tweets: HashMap<String, RawTweet>,
}

impl TweetTable {
  pub fn from_envelopes(envelopes: Vec<TweetEnvelope>) -> Self {
    let mut table = Self::default();
    for envelope in envelopes {
      table.insert(envelope.tweet);
    }
    table
  }

  pub fn insert(&mut self, tweet: RawTweet) {
    if !self.tweets.contains_key(&tweet.id_str) {
      self.ids.push(tweet.id_str.clone());
    }
    self.tweets.insert(tweet.id_str.clone(), tweet);
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &RawTweet> {
    self.ids.iter().map(|id| &self.tweets[id])
  }
}

/// Nombre de likes par identifiant de tweet. Les entrées sans `tweetId`
/// sont ignorées ; un identifiant absent vaut zéro.
#[derive(Debug, Default)]
pub struct LikeCountIndex {
  counts: HashMap<String, u64>,
}

impl LikeCountIndex {
  pub fn from_envelopes(likes: &[LikeEnvelope]) -> Self {
    let mut counts = HashMap::new();
    for like in likes {
      match like.like.tweet_id.as_deref() {
        Some(tweet_id) if !tweet_id.is_empty() => {
          *counts.entry(tweet_id.to_string()).or_insert(0) += 1;
        }
        _ => {}
      }
    }
    Self { counts }
  }

  pub fn count(&self, tweet_id: &str) -> u64 {
    self.counts.get(tweet_id).copied().unwrap_or(0)
  }
}

/// Projette chaque tweet de la table en une ligne de sortie, dans l'ordre
/// de la table.
pub fn build_records(tweets: &TweetTable, likes: &LikeCountIndex) -> Vec<TweetRecord> {
  tweets
    .iter()
    .map(|tweet| to_record(tweet, likes.count(&tweet.id_str)))
    .collect()
}

fn to_record(tweet: &RawTweet, like_count: u64) -> TweetRecord {
  let expanded_urls = tweet
    .entities
    .urls
    .iter()
    .filter_map(|url| url.expanded_url.as_deref())
    .join(", ");

  let media_url = tweet
    .entities
    .media
    .iter()
    .filter_map(|media| media.media_url.as_deref())
    .filter(|url| !url.is_empty())
    .join(", ");

  TweetRecord {
    tweet_id: tweet.id_str.clone(),
    in_reply_to_status_id: tweet.in_reply_to_status_id_str.clone().unwrap_or_default(),
    in_reply_to_user_id: tweet.in_reply_to_user_id_str.clone().unwrap_or_default(),
    in_reply_to_status_username: tweet.in_reply_to_screen_name.clone().unwrap_or_default(),
    timestamp: format_created_at(&tweet.created_at),
    source: strip_markup(&tweet.source),
    text: clean_text(&tweet.full_text),
    expanded_urls,
    tweet_url: format!(
      "https://twitter.com/{}/status/{}",
      tweet.user_id_str, tweet.id_str
    ),
    retweet_count: tweet.retweet_count,
    favorite_count: tweet.favorite_count,
    like_count,
    media_url,
  }
}

/// Reformate l'horodatage de l'export ; une valeur illisible donne une
/// chaîne vide et un avertissement, jamais une erreur.
pub fn format_created_at(created_at: &str) -> String {
  if created_at.is_empty() {
    return String::new();
  }
  match DateTime::parse_from_str(created_at, CREATED_AT_FORMAT) {
    Ok(date) => date.format(TIMESTAMP_FORMAT).to_string(),
    Err(e) => {
      tracing::warn!("Horodatage illisible '{}': {}", created_at, e);
      String::new()
    }
  }
}

/// Retire les balises du champ `source` (`<a href=...>client</a>`).
pub fn strip_markup(source: &str) -> String {
  Regex::new(r"<[^>]+>")
    .unwrap()
    .replace_all(source, "")
    .into_owned()
}

fn clean_text(text: &str) -> String {
  text
    .replace("\r\n", " ")
    .replace('\n', " ")
    .replace('\r', " ")
}
