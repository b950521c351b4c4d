use serde::{Deserialize, Deserializer};

/// Un élément du tableau de `tweets.js` : `{ "tweet": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetEnvelope {
  pub tweet: RawTweet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
  #[serde(default)]
  pub id_str: String,
  #[serde(default)]
  pub user_id_str: String,
  #[serde(default)]
  pub created_at: String,
  #[serde(default)]
  pub full_text: String,
  #[serde(default)]
  pub in_reply_to_status_id_str: Option<String>,
  #[serde(default)]
  pub in_reply_to_user_id_str: Option<String>,
  #[serde(default)]
  pub in_reply_to_screen_name: Option<String>,
  #[serde(default)]
  pub source: String,
  #[serde(default)]
  pub entities: Entities,
  // l'export encode les compteurs en chaînes ("17")
  #[serde(default, deserialize_with = "deserialize_count")]
  pub retweet_count: u64,
  #[serde(default, deserialize_with = "deserialize_count")]
  pub favorite_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
  #[serde(default, deserialize_with = "deserialize_null_default")]
  pub urls: Vec<UrlEntity>,
  #[serde(default, deserialize_with = "deserialize_null_default")]
  pub media: Vec<MediaEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlEntity {
  #[serde(default)]
  pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaEntity {
  #[serde(default)]
  pub media_url: Option<String>,
}

/// Un élément du tableau de `like.js` : `{ "like": { "tweetId": ... } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeEnvelope {
  #[serde(default)]
  pub like: RawLike,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLike {
  #[serde(rename = "tweetId", default)]
  pub tweet_id: Option<String>,
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  T: Default + Deserialize<'de>,
  D: Deserializer<'de>,
{
  let opt = Option::deserialize(deserializer)?;
  Ok(opt.unwrap_or_default())
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Count {
    Number(u64),
    Text(String),
  }

  match Count::deserialize(deserializer)? {
    Count::Number(n) => Ok(n),
    Count::Text(s) => s.parse().map_err(serde::de::Error::custom),
  }
}
