//! Indicator engine errors

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    /// Fewer price points than the engine minimum. Fatal for the call; the
    /// caller decides how to degrade.
    InsufficientData { have: usize, need: usize },
}

impl fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorError::InsufficientData { have, need } => write!(
                f,
                "insufficient price data for analysis: have {} points, need at least {}",
                have, need
            ),
        }
    }
}

impl std::error::Error for IndicatorError {}
