//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, search};

/// Default quiet interval before a search fires
pub const DEFAULT_DEBOUNCE_MS: u64 = search::DEBOUNCE_MS;

/// Default minimum query length
pub const DEFAULT_MIN_QUERY_CHARS: usize = search::MIN_QUERY_CHARS;

/// Default number of search candidates kept
pub const DEFAULT_RESULT_LIMIT: usize = search::RESULT_LIMIT;

/// Default geocoding provider
pub const DEFAULT_GEOCODER_URL: &str = api::NOMINATIM_URL;

/// Default User-Agent sent to the geocoding provider
pub const DEFAULT_USER_AGENT: &str = concat!("location-picker/", env!("CARGO_PKG_VERSION"));

/// Default country scope for forward searches
pub const DEFAULT_COUNTRY_CODES: &str = api::DEFAULT_COUNTRY_CODES;

/// Default geocoding request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = api::REQUEST_TIMEOUT_SECS;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default idle time before the server drops a session
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "location-picker";
