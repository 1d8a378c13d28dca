//! Forward geocoding candidates

use crate::error::Result;
use crate::location::{AddressParts, Coordinates, Location};
use serde::{Deserialize, Serialize};

/// One candidate returned by forward geocoding
///
/// Coordinates are kept as the provider's text and only parsed when the
/// candidate is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Human-readable full address
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub address: AddressParts,
}

impl SearchResult {
    /// Parse the candidate's coordinates
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::parse(&self.lat, &self.lon)
    }

    /// Build the `Location` this candidate resolves to
    ///
    /// Fails without side effects if the coordinates are malformed.
    pub fn to_location(&self) -> Result<Location> {
        let mut location = Location::at(self.coordinates()?);
        location.apply_address(&self.address);
        Ok(location)
    }
}
