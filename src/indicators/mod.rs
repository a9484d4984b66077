//! Indicator engine: pure computations over an OHLCV series
//!
//! Grouped by indicator family the way the rest of the crate consumes them.
//! Each function takes the full time-ordered series and derives the latest
//! value; [`engine`] ties them together and enforces the minimum-history
//! precondition and the numeric-safety policy.

pub mod engine;
pub mod error;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use engine::{compute_indicators, IndicatorEngine, MIN_HISTORY};
pub use error::IndicatorError;
