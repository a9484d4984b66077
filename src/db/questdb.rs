//! QuestDB storage for price history, analyses and news
//!
//! Analyses are append-only; the latest row per symbol is the current
//! analysis. Price history and news carry retention windows enforced by the
//! cleanup job.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

use crate::config;
use crate::models::analysis::{PairAnalysis, PairKind, SystemStats};
use crate::models::candle::Candle;
use crate::models::news::NewsArticle;

type DbError = Box<dyn std::error::Error + Send + Sync>;

fn db_error(context: &str, err: impl fmt::Display) -> DbError {
    Box::new(std::io::Error::other(format!("{}: {}", context, err)))
}

pub struct AnalysisDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl AnalysisDatabase {
    pub async fn new() -> Result<Self, DbError> {
        let questdb_url = config::get_questdb_url();
        let (client, connection) = tokio_postgres::connect(&questdb_url, NoTls)
            .await
            .map_err(|e| db_error("failed to connect to QuestDB", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            // QuestDB syntax: designated TIMESTAMP first, PARTITION BY after
            c.execute(
                "CREATE TABLE IF NOT EXISTS price_history (
                    timestamp TIMESTAMP,
                    symbol SYMBOL,
                    open DOUBLE,
                    high DOUBLE,
                    low DOUBLE,
                    close DOUBLE,
                    volume DOUBLE
                ) TIMESTAMP(timestamp) PARTITION BY DAY",
                &[],
            )
            .await
            .map_err(|e| db_error("failed to create price_history table", e))?;

            c.execute(
                "CREATE TABLE IF NOT EXISTS pair_analyses (
                    updated_at TIMESTAMP,
                    symbol SYMBOL,
                    pair_type SYMBOL,
                    price DOUBLE,
                    direction SYMBOL,
                    confidence DOUBLE,
                    analysis_json STRING
                ) TIMESTAMP(updated_at) PARTITION BY DAY",
                &[],
            )
            .await
            .map_err(|e| db_error("failed to create pair_analyses table", e))?;

            c.execute(
                "CREATE TABLE IF NOT EXISTS news (
                    created_at TIMESTAMP,
                    title STRING,
                    source STRING,
                    url STRING,
                    published_at TIMESTAMP,
                    sentiment DOUBLE,
                    impact_score DOUBLE,
                    relevant_pairs STRING
                ) TIMESTAMP(created_at) PARTITION BY DAY",
                &[],
            )
            .await
            .map_err(|e| db_error("failed to create news table", e))?;

            c.execute(
                "CREATE TABLE IF NOT EXISTS system_metadata (
                    task STRING,
                    last_run TIMESTAMP
                )",
                &[],
            )
            .await
            .map_err(|e| db_error("failed to create system_metadata table", e))?;
        }

        Ok(())
    }

    /// Store one price point, skipping duplicates on (symbol, timestamp).
    pub async fn store_price_point(&self, symbol: &str, candle: &Candle) -> Result<(), DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let timestamp = candle.timestamp.naive_utc();

            let row = c
                .query_one(
                    "SELECT count(*) FROM price_history WHERE symbol = $1 AND timestamp = $2",
                    &[&symbol, &timestamp],
                )
                .await
                .map_err(|e| db_error("failed to check for existing price point", e))?;
            let existing: i64 = row.get(0);
            if existing > 0 {
                return Ok(());
            }

            c.execute(
                "INSERT INTO price_history (timestamp, symbol, open, high, low, close, volume)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &timestamp,
                    &symbol,
                    &candle.open,
                    &candle.high,
                    &candle.low,
                    &candle.close,
                    &candle.volume,
                ],
            )
            .await
            .map_err(|e| db_error("failed to store price point", e))?;
        }

        Ok(())
    }

    /// Price history for a symbol over the trailing time window, ascending.
    pub async fn get_price_history(
        &self,
        symbol: &str,
        hours: i64,
    ) -> Result<Vec<Candle>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let cutoff = (Utc::now() - chrono::Duration::hours(hours)).naive_utc();
            let rows = c
                .query(
                    "SELECT timestamp, open, high, low, close, volume
                     FROM price_history
                     WHERE symbol = $1 AND timestamp >= $2
                     ORDER BY timestamp ASC",
                    &[&symbol, &cutoff],
                )
                .await
                .map_err(|e| db_error("failed to load price history", e))?;

            let candles = rows
                .iter()
                .map(|row| {
                    let timestamp: NaiveDateTime = row.get(0);
                    Candle::new(
                        row.get(1),
                        row.get(2),
                        row.get(3),
                        row.get(4),
                        row.get(5),
                        timestamp.and_utc(),
                    )
                })
                .collect();
            return Ok(candles);
        }

        Ok(Vec::new())
    }

    /// Delete price points older than the retention window. Returns the
    /// number of rows removed.
    pub async fn cleanup_old_prices(&self, days_to_keep: i64) -> Result<u64, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let cutoff = (Utc::now() - chrono::Duration::days(days_to_keep)).naive_utc();
            let deleted = c
                .execute("DELETE FROM price_history WHERE timestamp < $1", &[&cutoff])
                .await
                .map_err(|e| db_error("failed to clean up old prices", e))?;
            return Ok(deleted);
        }
        Ok(0)
    }

    /// Append a pair analysis. The full document is stored as JSON alongside
    /// the columns used for filtering.
    pub async fn store_analysis(&self, analysis: &PairAnalysis) -> Result<(), DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let json = serde_json::to_string(analysis)
                .map_err(|e| db_error("failed to serialize analysis", e))?;
            let direction = serde_json::to_value(analysis.signal.direction)
                .ok()
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .unwrap_or_else(|| "NEUTRAL".to_string());
            let updated_at = Utc::now().naive_utc();

            c.execute(
                "INSERT INTO pair_analyses (updated_at, symbol, pair_type, price, direction, confidence, analysis_json)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &updated_at,
                    &analysis.symbol,
                    &analysis.kind.as_str(),
                    &analysis.price,
                    &direction,
                    &analysis.signal.confidence,
                    &json,
                ],
            )
            .await
            .map_err(|e| db_error("failed to store analysis", e))?;
        }

        Ok(())
    }

    /// Latest analysis for one symbol.
    pub async fn get_analysis(&self, symbol: &str) -> Result<Option<PairAnalysis>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let rows = c
                .query(
                    "SELECT analysis_json FROM pair_analyses
                     WHERE symbol = $1
                     ORDER BY updated_at DESC
                     LIMIT 1",
                    &[&symbol],
                )
                .await
                .map_err(|e| db_error("failed to load analysis", e))?;

            if let Some(row) = rows.first() {
                let json: String = row.get(0);
                let analysis = serde_json::from_str(&json)
                    .map_err(|e| db_error("failed to parse stored analysis", e))?;
                return Ok(Some(analysis));
            }
        }

        Ok(None)
    }

    /// Latest analysis per symbol, optionally filtered by pair kind.
    pub async fn get_all_analyses(
        &self,
        kind: Option<PairKind>,
    ) -> Result<Vec<PairAnalysis>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let rows = match kind {
                Some(kind) => c
                    .query(
                        "SELECT analysis_json FROM pair_analyses
                         LATEST ON updated_at PARTITION BY symbol
                         WHERE pair_type = $1
                         ORDER BY symbol ASC",
                        &[&kind.as_str()],
                    )
                    .await,
                None => c
                    .query(
                        "SELECT analysis_json FROM pair_analyses
                         LATEST ON updated_at PARTITION BY symbol
                         ORDER BY symbol ASC",
                        &[],
                    )
                    .await,
            }
            .map_err(|e| db_error("failed to load analyses", e))?;

            return rows
                .iter()
                .map(|row| {
                    let json: String = row.get(0);
                    serde_json::from_str(&json)
                        .map_err(|e| db_error("failed to parse stored analysis", e))
                })
                .collect();
        }

        Ok(Vec::new())
    }

    /// Latest analyses whose signal confidence meets the threshold.
    pub async fn get_high_confidence(
        &self,
        min_confidence: f64,
    ) -> Result<Vec<PairAnalysis>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let rows = c
                .query(
                    "SELECT analysis_json FROM pair_analyses
                     LATEST ON updated_at PARTITION BY symbol
                     WHERE confidence >= $1
                     ORDER BY confidence DESC",
                    &[&min_confidence],
                )
                .await
                .map_err(|e| db_error("failed to load high-confidence analyses", e))?;

            return rows
                .iter()
                .map(|row| {
                    let json: String = row.get(0);
                    serde_json::from_str(&json)
                        .map_err(|e| db_error("failed to parse stored analysis", e))
                })
                .collect();
        }

        Ok(Vec::new())
    }

    /// Store a scored article, skipping duplicates on (title, source).
    pub async fn store_news(&self, article: &NewsArticle) -> Result<(), DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let row = c
                .query_one(
                    "SELECT count(*) FROM news WHERE title = $1 AND source = $2",
                    &[&article.title, &article.source],
                )
                .await
                .map_err(|e| db_error("failed to check for existing article", e))?;
            let existing: i64 = row.get(0);
            if existing > 0 {
                return Ok(());
            }

            let created_at = Utc::now().naive_utc();
            let published_at = article.published_at.naive_utc();
            let relevant = article.relevant_pairs.join(",");

            c.execute(
                "INSERT INTO news (created_at, title, source, url, published_at, sentiment, impact_score, relevant_pairs)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &created_at,
                    &article.title,
                    &article.source,
                    &article.url,
                    &published_at,
                    &article.sentiment,
                    &article.impact_score,
                    &relevant,
                ],
            )
            .await
            .map_err(|e| db_error("failed to store article", e))?;
        }

        Ok(())
    }

    /// News relevant to one pair within the trailing window, highest impact
    /// first.
    pub async fn get_pair_news(
        &self,
        symbol: &str,
        hours: i64,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let cutoff = (Utc::now() - chrono::Duration::hours(hours)).naive_utc();
            let pattern = format!("%{}%", symbol);
            let query = format!(
                "SELECT title, source, url, published_at, sentiment, impact_score, relevant_pairs
                 FROM news
                 WHERE relevant_pairs LIKE $1 AND published_at >= $2
                 ORDER BY impact_score DESC
                 LIMIT {}",
                limit
            );
            let rows = c
                .query(&query, &[&pattern, &cutoff])
                .await
                .map_err(|e| db_error("failed to load pair news", e))?;
            return Ok(rows.iter().map(news_from_row).collect());
        }

        Ok(Vec::new())
    }

    /// Most recent articles regardless of pair.
    pub async fn get_recent_news(&self, limit: usize) -> Result<Vec<NewsArticle>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let query = format!(
                "SELECT title, source, url, published_at, sentiment, impact_score, relevant_pairs
                 FROM news
                 ORDER BY published_at DESC
                 LIMIT {}",
                limit
            );
            let rows = c
                .query(&query, &[])
                .await
                .map_err(|e| db_error("failed to load recent news", e))?;
            return Ok(rows.iter().map(news_from_row).collect());
        }

        Ok(Vec::new())
    }

    /// Delete articles older than the retention window.
    pub async fn cleanup_old_news(&self, days_to_keep: i64) -> Result<u64, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let cutoff = (Utc::now() - chrono::Duration::days(days_to_keep)).naive_utc();
            let deleted = c
                .execute("DELETE FROM news WHERE published_at < $1", &[&cutoff])
                .await
                .map_err(|e| db_error("failed to clean up old news", e))?;
            return Ok(deleted);
        }
        Ok(0)
    }

    /// Record when a task last ran.
    pub async fn update_last_run(&self, task: &str) -> Result<(), DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let now = Utc::now().naive_utc();
            c.execute(
                "INSERT INTO system_metadata (task, last_run) VALUES ($1, $2)",
                &[&task, &now],
            )
            .await
            .map_err(|e| db_error("failed to record last run", e))?;
        }
        Ok(())
    }

    pub async fn get_last_run(&self, task: &str) -> Result<Option<DateTime<Utc>>, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let rows = c
                .query(
                    "SELECT last_run FROM system_metadata
                     WHERE task = $1
                     ORDER BY last_run DESC
                     LIMIT 1",
                    &[&task],
                )
                .await
                .map_err(|e| db_error("failed to load last run", e))?;
            if let Some(row) = rows.first() {
                let last_run: NaiveDateTime = row.get(0);
                return Ok(Some(last_run.and_utc()));
            }
        }
        Ok(None)
    }

    /// Overview counters for the analysis listing endpoint.
    pub async fn get_system_stats(&self) -> Result<SystemStats, DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let total_pairs = count_query(c, "SELECT count(DISTINCT symbol) FROM pair_analyses").await?;
            let crypto_pairs = count_query(
                c,
                "SELECT count(DISTINCT symbol) FROM pair_analyses WHERE pair_type = 'crypto'",
            )
            .await?;
            let forex_pairs = count_query(
                c,
                "SELECT count(DISTINCT symbol) FROM pair_analyses WHERE pair_type = 'forex'",
            )
            .await?;
            let high_confidence_signals = count_query(
                c,
                "SELECT count(*) FROM (SELECT confidence FROM pair_analyses
                 LATEST ON updated_at PARTITION BY symbol) WHERE confidence >= 75.0",
            )
            .await?;
            let news_articles = count_query(c, "SELECT count(*) FROM news").await?;
            let price_points = count_query(c, "SELECT count(*) FROM price_history").await?;

            let row = c
                .query_one("SELECT max(updated_at) FROM pair_analyses", &[])
                .await
                .map_err(|e| db_error("failed to load last update", e))?;
            let last_update: Option<NaiveDateTime> = row.get(0);

            return Ok(SystemStats {
                total_pairs,
                crypto_pairs,
                forex_pairs,
                high_confidence_signals,
                news_articles,
                price_points,
                last_update: last_update.map(|t| t.and_utc()),
            });
        }

        Err(db_error("database unavailable", "no client"))
    }
}

async fn count_query(client: &Client, query: &str) -> Result<i64, DbError> {
    let row = client
        .query_one(query, &[])
        .await
        .map_err(|e| db_error("failed to run count query", e))?;
    Ok(row.get(0))
}

fn news_from_row(row: &tokio_postgres::Row) -> NewsArticle {
    let published_at: NaiveDateTime = row.get(3);
    let relevant: String = row.get(6);
    NewsArticle {
        title: row.get(0),
        source: row.get(1),
        url: row.get(2),
        published_at: published_at.and_utc(),
        sentiment: row.get(4),
        impact_score: row.get(5),
        relevant_pairs: relevant
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect(),
    }
}
