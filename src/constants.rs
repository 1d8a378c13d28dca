//! Centralized constants for the location-picker crate
//!
//! Constants shared by the picker, the geocoder and the config defaults.

/// Search input tuning
pub mod search {
    /// Quiet interval before a search fires, in milliseconds
    pub const DEBOUNCE_MS: u64 = 500;

    /// Minimum trimmed query length (in characters) that triggers a search
    pub const MIN_QUERY_CHARS: usize = 3;

    /// Maximum number of candidates kept from a forward search
    pub const RESULT_LIMIT: usize = 5;
}

/// Pincode validation
pub mod pincode {
    /// Longest postal code accepted by the pincode lookup
    pub const MAX_LEN: usize = 10;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Country scope applied to forward searches
    pub const DEFAULT_COUNTRY_CODES: &str = "in";

    /// Request timeout for geocoding calls in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}
