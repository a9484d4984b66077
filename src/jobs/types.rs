//! Job types for the bulk-update workflow

use serde::{Deserialize, Serialize};

/// Re-analyze one trading pair and store the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePairJob {
    pub symbol: String,
}

/// Fetch market news, score it and store fresh articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshNewsJob;

/// Apply the retention windows to stored prices and news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupJob;
