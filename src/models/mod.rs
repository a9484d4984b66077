//! Data models shared across the crate

pub mod analysis;
pub mod candle;
pub mod indicators;
pub mod news;
pub mod signal;

pub use analysis::{PairAnalysis, PairKind, SystemStats};
pub use candle::Candle;
pub use indicators::IndicatorSet;
pub use news::NewsArticle;
pub use signal::{Signal, SignalDirection};
