//! Scored news articles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article after relevance/sentiment/impact scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    /// Keyword sentiment in [-1, 1].
    pub sentiment: f64,
    /// Symbols this article is relevant to.
    pub relevant_pairs: Vec<String>,
    /// Impact score in [0, 10].
    pub impact_score: f64,
}
