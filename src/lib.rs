//! Pairscope: technical-analysis engine and trading-signal service
//!
//! The crate splits into a pure analysis core and an orchestration layer
//! around it:
//!
//! - [`indicators`] computes RSI, MACD, Bollinger Bands, ATR,
//!   support/resistance, trend and volume figures from OHLCV history.
//! - [`signals`] fuses an indicator set into a single directional trading
//!   signal with confidence and entry/stop/target levels.
//! - [`services`], [`db`], [`jobs`] and [`core`] fetch market data, persist
//!   analyses and drive scheduled bulk updates; none of them leak into the
//!   analysis core.

pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use indicators::{compute_indicators, IndicatorEngine, IndicatorError};
pub use signals::SignalFuser;
