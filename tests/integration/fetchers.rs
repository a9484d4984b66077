//! Integration tests for the market data and news fetchers
//!
//! Each test pins the HTTP contract with the upstream API against a mock
//! server; no real network access.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pairscope::models::analysis::PairKind;
use pairscope::services::coingecko::CoinGeckoFeed;
use pairscope::services::forex::ForexFeed;
use pairscope::services::news::NewsFetcher;
use pairscope::services::price_feed::FeedError;

#[tokio::test]
async fn coingecko_quote_parses_the_simple_price_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", "bitcoin"))
        .and(query_param("vs_currencies", "usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bitcoin": {
                "usd": 64250.5,
                "usd_24h_change": 2.4,
                "usd_24h_vol": 1_250_000.0
            }
        })))
        .mount(&server)
        .await;

    let feed = CoinGeckoFeed::with_base_url(server.uri());
    let quote = feed.fetch_quote("BTCUSDT").await.expect("quote");

    assert_eq!(quote.symbol, "BTCUSDT");
    assert_eq!(quote.kind, PairKind::Crypto);
    assert_eq!(quote.price, 64250.5);
    assert_eq!(quote.change_24h, 2.4);
    assert_eq!(quote.volume, 1_250_000.0);
    assert_eq!(quote.source, "coingecko");
}

#[tokio::test]
async fn coingecko_history_maps_ohlc_rows_to_candles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/ethereum/ohlc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [1_700_000_000_000i64, 2000.0, 2050.0, 1990.0, 2040.0],
            [1_700_003_600_000i64, 2040.0, 2060.0, 2020.0, 2055.0]
        ])))
        .mount(&server)
        .await;

    let feed = CoinGeckoFeed::with_base_url(server.uri());
    let candles = feed.fetch_history("ETHUSDT", 7).await.expect("history");

    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].open, 2000.0);
    assert_eq!(candles[0].high, 2050.0);
    assert_eq!(candles[0].low, 1990.0);
    assert_eq!(candles[0].close, 2040.0);
    // the OHLC endpoint carries no volume
    assert_eq!(candles[0].volume, 0.0);
    assert!(candles[1].timestamp > candles[0].timestamp);
}

#[tokio::test]
async fn coingecko_rejects_unmapped_symbols() {
    let feed = CoinGeckoFeed::with_base_url("http://127.0.0.1:1");
    let err = feed.fetch_quote("EURUSD").await.unwrap_err();
    assert!(matches!(err, FeedError::UnknownSymbol(_)));
}

#[tokio::test]
async fn forex_quote_falls_back_to_eodhd_without_a_polygon_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/real-time/EURUSD.FOREX"))
        .and(query_param("fmt", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "EURUSD.FOREX",
            "close": 1.0842,
            "change_p": -0.12
        })))
        .mount(&server)
        .await;

    let feed =
        ForexFeed::new(None, Some("test-key".to_string()), None).with_eodhd_base(server.uri());
    let quote = feed.fetch_quote("EURUSD").await.expect("quote");

    assert_eq!(quote.price, 1.0842);
    assert_eq!(quote.change_24h, -0.12);
    assert_eq!(quote.source, "eodhd");
    assert_eq!(quote.kind, PairKind::Forex);
}

#[tokio::test]
async fn forex_quote_falls_back_to_alpha_vantage_when_eodhd_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/real-time/GBPUSD.FOREX"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "CURRENCY_EXCHANGE_RATE"))
        .and(query_param("from_currency", "GBP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Realtime Currency Exchange Rate": {
                "5. Exchange Rate": "1.2500"
            }
        })))
        .mount(&server)
        .await;

    let feed = ForexFeed::new(
        None,
        Some("eodhd-key".to_string()),
        Some("av-key".to_string()),
    )
    .with_eodhd_base(server.uri())
    .with_alpha_vantage_base(server.uri());

    let quote = feed.fetch_quote("GBPUSD").await.expect("quote");
    assert_eq!(quote.price, 1.25);
    assert_eq!(quote.source, "alphavantage");
}

#[tokio::test]
async fn polygon_quote_reads_the_latest_aggregate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultsCount": 2,
            "results": [
                {"o": 1.1000, "c": 1.1010, "v": 120.0},
                {"o": 1.1010, "c": 1.1055, "v": 80.0}
            ]
        })))
        .mount(&server)
        .await;

    let feed =
        ForexFeed::new(Some("poly-key".to_string()), None, None).with_polygon_base(server.uri());
    let quote = feed.fetch_quote("EURUSD").await.expect("quote");

    assert_eq!(quote.price, 1.1055);
    assert_eq!(quote.source, "polygon");
    assert!(quote.change_24h > 0.0);
}

#[tokio::test]
async fn forex_history_parses_eodhd_bars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/eod/EURUSD.FOREX"))
        .and(query_param("period", "h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2026-08-05 10:00:00", "open": 1.10, "high": 1.12, "low": 1.09, "close": 1.11, "volume": 0},
            {"date": "2026-08-05 11:00:00", "open": 1.11, "high": 1.13, "low": 1.10, "close": 1.12, "volume": 0}
        ])))
        .mount(&server)
        .await;

    let feed =
        ForexFeed::new(None, Some("test-key".to_string()), None).with_eodhd_base(server.uri());
    let candles = feed.fetch_history("EURUSD", 7).await.expect("history");

    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].close, 1.11);
    assert!(candles[1].timestamp > candles[0].timestamp);
}

#[tokio::test]
async fn news_fetch_parses_and_returns_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "articles": [
                {
                    "source": {"id": null, "name": "Reuters"},
                    "title": "Bitcoin rallies on ETF inflows",
                    "description": "Spot ETF demand lifts bitcoin",
                    "url": "https://example.com/article",
                    "publishedAt": "2026-08-05T12:00:00Z"
                }
            ]
        })))
        .mount(&server)
        .await;

    let fetcher = NewsFetcher::new(Some("news-key".to_string())).with_base_url(server.uri());
    let articles = fetcher.fetch_market_news().await.expect("articles");

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].source, "Reuters");
    assert_eq!(articles[0].title, "Bitcoin rallies on ETF inflows");
}

#[tokio::test]
async fn news_fetch_without_a_key_is_a_quiet_no_op() {
    let fetcher = NewsFetcher::new(None);
    let articles = fetcher.fetch_market_news().await.expect("no-op");
    assert!(articles.is_empty());
}
