//! Market news: fetching and keyword scoring
//!
//! Articles are scored three ways before storage: relevance (which tracked
//! pairs they mention), sentiment (positive/negative keyword balance) and
//! impact (source credibility, relevance breadth, recency).

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::math;
use crate::config;
use crate::models::news::NewsArticle;
use crate::services::price_feed::FeedError;

const NEWSAPI_BASE: &str = "https://newsapi.org/v2";

/// Keyword map from tracked pairs to terms that mark an article relevant.
const PAIR_KEYWORDS: &[(&str, &[&str])] = &[
    ("BTCUSDT", &["bitcoin", "btc"]),
    ("ETHUSDT", &["ethereum", "eth"]),
    ("ETCUSDT", &["ethereum classic", "etc"]),
    ("SOLUSDT", &["solana", "sol"]),
    ("DOGEUSDT", &["dogecoin", "doge"]),
    ("EURUSD", &["euro", "eur", "european", "ecb"]),
    ("GBPUSD", &["pound", "sterling", "gbp", "uk", "britain"]),
    ("USDJPY", &["yen", "jpy", "japan", "boj"]),
    ("GBPJPY", &["pound", "yen", "gbp", "jpy"]),
    ("AUDUSD", &["aussie", "aud", "australia", "rba"]),
    ("USDCAD", &["loonie", "cad", "canada", "boc"]),
];

const POSITIVE_WORDS: &[&str] = &[
    "surge", "rally", "gain", "rise", "bullish", "boom", "growth", "profit", "positive", "up",
    "strong", "optimistic", "recovery",
];

const NEGATIVE_WORDS: &[&str] = &[
    "crash", "fall", "drop", "decline", "bearish", "loss", "weak", "negative", "down", "risk",
    "concern", "warning", "crisis",
];

const CREDIBLE_SOURCES: &[&str] = &[
    "reuters",
    "bloomberg",
    "financial times",
    "wall street journal",
    "cnbc",
    "marketwatch",
    "forbes",
    "coindesk",
];

/// Unscored article as returned by the news API.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    source: ApiSource,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSource {
    #[serde(default)]
    name: String,
}

pub struct NewsFetcher {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: NEWSAPI_BASE.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::newsapi_key())
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }

    /// Fetch recent market news. Without an API key this is a no-op that
    /// returns an empty list, matching the degrade-quietly behavior of the
    /// price feeds.
    pub async fn fetch_market_news(&self) -> Result<Vec<RawArticle>, FeedError> {
        let key = match &self.api_key {
            Some(k) => k.clone(),
            None => return Ok(Vec::new()),
        };

        let url = format!("{}/everything", self.base_url);
        let response: ApiResponse = (|| async {
            self.client
                .get(&url)
                .query(&[
                    ("q", "forex OR cryptocurrency OR bitcoin OR trading"),
                    ("language", "en"),
                    ("sortBy", "publishedAt"),
                    ("pageSize", "20"),
                    ("apiKey", key.as_str()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json::<ApiResponse>()
                .await
        })
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(250))
                .with_max_times(2),
        )
        .await?;

        if response.status != "ok" {
            return Err(FeedError::Upstream(format!(
                "news api returned status {}",
                response.status
            )));
        }

        Ok(response
            .articles
            .into_iter()
            .map(|a| RawArticle {
                title: a.title,
                description: a.description.unwrap_or_default(),
                source: a.source.name,
                url: a.url,
                published_at: a.published_at.unwrap_or_else(Utc::now),
            })
            .collect())
    }
}

/// Which tracked pairs an article is relevant to.
///
/// Keyword hits win; articles that only mention crypto or forex in general
/// map to the flagship pairs of that side.
pub fn relevant_pairs(title: &str, description: &str) -> Vec<String> {
    let text = format!("{} {}", title, description).to_lowercase();

    let mut pairs: Vec<String> = PAIR_KEYWORDS
        .iter()
        .filter(|(_, terms)| terms.iter().any(|term| text.contains(term)))
        .map(|(pair, _)| pair.to_string())
        .collect();

    if pairs.is_empty() {
        if text.contains("crypto") || text.contains("bitcoin") {
            pairs = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];
        } else if text.contains("forex") || text.contains("dollar") {
            pairs = vec!["EURUSD".to_string(), "GBPUSD".to_string()];
        }
    }

    pairs
}

/// Keyword sentiment in [-1, 1], 0 when no sentiment words match.
pub fn sentiment_score(title: &str, description: &str) -> f64 {
    let text = format!("{} {}", title, description).to_lowercase();

    let positive = POSITIVE_WORDS.iter().filter(|w| text.contains(*w)).count() as f64;
    let negative = NEGATIVE_WORDS.iter().filter(|w| text.contains(*w)).count() as f64;

    let total = positive + negative;
    if total == 0.0 {
        return 0.0;
    }
    math::round_to((positive - negative) / total, 2)
}

/// Impact score in [0, 10]: base 5, boosted by source credibility, relevance
/// breadth and recency.
pub fn impact_score(source: &str, relevant: &[String], published_at: DateTime<Utc>) -> f64 {
    let mut score: f64 = 5.0;

    let source_lower = source.to_lowercase();
    if CREDIBLE_SOURCES.iter().any(|s| source_lower.contains(s)) {
        score += 2.0;
    }

    if relevant.len() > 2 {
        score += 1.0;
    }

    let hours_old = (Utc::now() - published_at).num_seconds() as f64 / 3600.0;
    if hours_old < 6.0 {
        score += 2.0;
    } else if hours_old < 24.0 {
        score += 1.0;
    }

    score.min(10.0)
}

/// Run all three scorers over a raw article.
pub fn score_article(raw: &RawArticle) -> NewsArticle {
    let relevant = relevant_pairs(&raw.title, &raw.description);
    let sentiment = sentiment_score(&raw.title, &raw.description);
    let impact = impact_score(&raw.source, &relevant, raw.published_at);

    NewsArticle {
        title: raw.title.clone(),
        source: raw.source.clone(),
        url: raw.url.clone(),
        published_at: raw.published_at,
        sentiment,
        relevant_pairs: relevant,
        impact_score: impact,
    }
}
