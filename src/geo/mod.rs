//! Geocoding module
//!
//! Forward search, postcode lookup and reverse geocoding against an external
//! provider. The picker only talks to the `GeoBackend` trait, so the provider
//! is substitutable.

pub mod nominatim;

#[cfg(test)]
pub(crate) mod scripted;

use crate::config::Config;
use crate::error::Result;
use crate::location::{AddressParts, Coordinates, SearchResult};
use std::future::Future;

/// Trait for geocoding backends
///
/// Implementations must be thread-safe (Send + Sync) to be shared by the
/// picker's background tasks.
pub trait GeoBackend: Send + Sync + 'static {
    /// Forward geocode free text to an ordered list of candidates
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchResult>>> + Send;

    /// Forward geocode a postal code to an ordered list of candidates
    fn lookup_postcode(
        &self,
        postcode: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>>> + Send;

    /// Reverse geocode a point to its address components
    ///
    /// Returns None when the provider has no address for the point
    fn reverse(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<Option<AddressParts>>> + Send;
}

/// Get the configured geocoding backend
pub fn get_geocoder(config: &Config) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_geocoder_uses_config() {
        let mut config = Config::default();
        config.geocoder.url = "http://localhost:8088/".to_string();

        let geocoder = get_geocoder(&config).unwrap();
        assert_eq!(geocoder.base_url(), "http://localhost:8088");
    }
}
