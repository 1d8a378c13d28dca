//! Location search & resolution coordinator
//!
//! Reconciles free-text search, map clicks and manual field edits into one
//! selected `Location`:
//! - `timer`: cancellable fire-once debounce timer
//! - `sequence`: request sequencing that drops stale completions
//! - `search`: turns keystrokes into at most one search per quiet period
//! - `resolver`: turns a point, a search result or a pincode into a `Location`
//! - `session`: the owned selection state shared by all of the above

pub mod resolver;
pub mod search;
pub mod sequence;
pub mod session;
pub mod timer;

pub use session::{PickerSession, PickerSnapshot};

use crate::config::SearchConfig;
use crate::constants::search::{DEBOUNCE_MS, MIN_QUERY_CHARS, RESULT_LIMIT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Selection lifecycle
///
/// `Empty -> PointOnly -> Resolved -> Confirmed`, with `cancel` returning to
/// `Empty` from anywhere and a new point moving `Resolved` back to `PointOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing selected yet
    #[default]
    Empty,
    /// Coordinates set, reverse geocoding in flight
    PointOnly,
    /// Text fields populated, or left as they were after a failed lookup
    Resolved,
    /// Handed to the caller
    Confirmed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::PointOnly => write!(f, "point_only"),
            Self::Resolved => write!(f, "resolved"),
            Self::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Tuning for one picker session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerSettings {
    /// Quiet interval before a search fires
    pub debounce: Duration,
    /// Minimum trimmed query length that triggers a search
    pub min_query_chars: usize,
    /// Maximum number of candidates kept
    pub result_limit: usize,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            min_query_chars: MIN_QUERY_CHARS,
            result_limit: RESULT_LIMIT,
        }
    }
}

impl From<&SearchConfig> for PickerSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_chars: config.min_query_chars,
            result_limit: config.result_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = SearchConfig {
            debounce_ms: 250,
            min_query_chars: 4,
            result_limit: 3,
        };
        let settings = PickerSettings::from(&config);

        assert_eq!(settings.debounce, Duration::from_millis(250));
        assert_eq!(settings.min_query_chars, 4);
        assert_eq!(settings.result_limit, 3);
    }

    #[test]
    fn test_default_settings() {
        let settings = PickerSettings::default();
        assert_eq!(settings.debounce, Duration::from_millis(500));
        assert_eq!(settings.min_query_chars, 3);
        assert_eq!(settings.result_limit, 5);
    }

    #[test]
    fn test_phase_serialization() {
        assert_eq!(
            serde_json::to_string(&Phase::PointOnly).unwrap(),
            "\"point_only\""
        );
        assert_eq!(Phase::default(), Phase::Empty);
        assert_eq!(Phase::Confirmed.to_string(), "confirmed");
    }
}
