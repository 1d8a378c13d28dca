//! Selected location data model
//!
//! This module handles:
//! - Coordinates and their range validation
//! - The canonical `Location` record the picker writes to
//! - Mapping provider address components onto `Location` fields
//! - Search candidates returned by forward geocoding

pub mod address;
pub mod result;

pub use address::AddressParts;
pub use result::SearchResult;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Parse provider text coordinates
    ///
    /// Malformed text is an error, never coerced to zero.
    pub fn parse(lat: &str, lon: &str) -> Result<Self> {
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid latitude: {:?}", lat)))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid longitude: {:?}", lon)))?;

        let coords = Self::new(latitude, longitude);
        coords.validate()?;
        Ok(coords)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// The canonical selected place
///
/// Textual fields may be empty independently of each other. `coordinates`
/// stays at `{0, 0}` until the first selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub coordinates: Coordinates,
}

impl Location {
    /// Location at a point with no textual fields yet
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            ..Self::default()
        }
    }

    /// Replace all derived text fields from a provider address
    ///
    /// Every field is recomputed, so a component missing from `parts`
    /// clears the previous value instead of leaving it behind.
    pub fn apply_address(&mut self, parts: &AddressParts) {
        let fields = parts.to_fields();
        self.pincode = fields.pincode;
        self.state = fields.state;
        self.district = fields.district;
        self.place = fields.place;
    }

    /// Apply a manual edit, leaving untouched fields as they are
    pub fn apply_patch(&mut self, patch: &LocationPatch) {
        if let Some(pincode) = &patch.pincode {
            self.pincode = pincode.clone();
        }
        if let Some(state) = &patch.state {
            self.state = state.clone();
        }
        if let Some(district) = &patch.district {
            self.district = district.clone();
        }
        if let Some(place) = &patch.place {
            self.place = place.clone();
        }
    }

    /// True when no text field has been populated
    pub fn has_no_text(&self) -> bool {
        self.pincode.is_empty()
            && self.state.is_empty()
            && self.district.is_empty()
            && self.place.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.place, &self.district, &self.state, &self.pincode]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            write!(f, "({})", self.coordinates)
        } else {
            write!(f, "{} ({})", parts.join(", "), self.coordinates)
        }
    }
}

/// Manual field edits coming from the form
///
/// `None` leaves a field unchanged; `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self.pincode.is_none()
            && self.state.is_none()
            && self.district.is_none()
            && self.place.is_none()
    }
}
