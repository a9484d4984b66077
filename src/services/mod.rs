//! External data services: market data feeds, news, and the analyzer that
//! orchestrates them around the analysis core.

pub mod analyzer;
pub mod coingecko;
pub mod forex;
pub mod news;
pub mod price_feed;

pub use analyzer::PairAnalyzer;
pub use coingecko::CoinGeckoFeed;
pub use forex::ForexFeed;
pub use news::NewsFetcher;
pub use price_feed::{DataFetcher, FeedError, PriceFeed, PriceQuote, RateLimiter};
