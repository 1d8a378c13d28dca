//! Provider address components and field precedence
//!
//! Administrative naming differs by country and provider (a district may be
//! reported as `state_district` or only as `county`), so the fallback order
//! below is fixed and must not be reshuffled.

use serde::{Deserialize, Serialize};

/// Address component bag returned by forward and reverse geocoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
}

/// Text fields derived from one address, assigned to a `Location` together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFields {
    pub pincode: String,
    pub state: String,
    pub district: String,
    pub place: String,
}

impl AddressParts {
    /// Postal code, or empty
    pub fn pincode(&self) -> String {
        first_present(&[&self.postcode])
    }

    /// State district, else county, else empty
    pub fn district(&self) -> String {
        first_present(&[&self.state_district, &self.county])
    }

    /// City, else town, else village, else suburb, else empty
    pub fn place(&self) -> String {
        first_present(&[&self.city, &self.town, &self.village, &self.suburb])
    }

    /// State name, or empty
    pub fn state_name(&self) -> String {
        first_present(&[&self.state])
    }

    /// Compute every derived field at once
    pub fn to_fields(&self) -> DerivedFields {
        DerivedFields {
            pincode: self.pincode(),
            state: self.state_name(),
            district: self.district(),
            place: self.place(),
        }
    }

    /// True when none of the components is present
    pub fn is_empty(&self) -> bool {
        self.to_fields() == DerivedFields::default()
    }
}

/// First non-blank value in precedence order
fn first_present(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_place_prefers_city_over_town() {
        let parts = AddressParts {
            city: some("Mumbai"),
            town: some("Thane"),
            village: some("Versova"),
            suburb: some("Colaba"),
            ..Default::default()
        };
        assert_eq!(parts.place(), "Mumbai");
    }

    #[test]
    fn test_place_falls_back_to_town() {
        let parts = AddressParts {
            town: some("Lonavala"),
            village: some("Kune"),
            ..Default::default()
        };
        assert_eq!(parts.place(), "Lonavala");
    }

    #[test]
    fn test_place_falls_back_to_village() {
        let parts = AddressParts {
            village: some("Malshej"),
            ..Default::default()
        };
        assert_eq!(parts.place(), "Malshej");
    }

    #[test]
    fn test_place_falls_back_to_suburb() {
        let parts = AddressParts {
            suburb: some("Bandra West"),
            ..Default::default()
        };
        assert_eq!(parts.place(), "Bandra West");
    }

    #[test]
    fn test_place_empty_when_absent() {
        assert_eq!(AddressParts::default().place(), "");
    }

    #[test]
    fn test_district_prefers_state_district_over_county() {
        let parts = AddressParts {
            state_district: some("Pune District"),
            county: some("Haveli"),
            ..Default::default()
        };
        assert_eq!(parts.district(), "Pune District");
    }

    #[test]
    fn test_district_falls_back_to_county() {
        let parts = AddressParts {
            county: some("Haveli"),
            ..Default::default()
        };
        assert_eq!(parts.district(), "Haveli");
        assert_eq!(AddressParts::default().district(), "");
    }

    #[test]
    fn test_pincode_and_state() {
        let parts = AddressParts {
            postcode: some("411001"),
            state: some("Maharashtra"),
            ..Default::default()
        };
        assert_eq!(parts.pincode(), "411001");
        assert_eq!(parts.state_name(), "Maharashtra");
        assert_eq!(AddressParts::default().pincode(), "");
        assert_eq!(AddressParts::default().state_name(), "");
    }

    #[test]
    fn test_blank_values_fall_through() {
        let parts = AddressParts {
            city: some("   "),
            town: some("Alibag"),
            state_district: some(""),
            county: some("Raigad"),
            ..Default::default()
        };
        assert_eq!(parts.place(), "Alibag");
        assert_eq!(parts.district(), "Raigad");
    }

    #[test]
    fn test_place_without_state_is_allowed() {
        let fields = AddressParts {
            village: some("Kune"),
            ..Default::default()
        }
        .to_fields();

        assert_eq!(fields.place, "Kune");
        assert_eq!(fields.state, "");
    }

    #[test]
    fn test_is_empty() {
        assert!(AddressParts::default().is_empty());
        assert!(AddressParts {
            city: some(" "),
            ..Default::default()
        }
        .is_empty());
        assert!(!AddressParts {
            suburb: some("Colaba"),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_deserialize_ignores_unknown_components() {
        let json = r#"{
            "road": "Marine Drive",
            "suburb": "Churchgate",
            "city": "Mumbai",
            "state_district": "Mumbai City",
            "state": "Maharashtra",
            "ISO3166-2-lvl4": "IN-MH",
            "postcode": "400020",
            "country": "India",
            "country_code": "in"
        }"#;

        let parts: AddressParts = serde_json::from_str(json).unwrap();
        let fields = parts.to_fields();
        assert_eq!(fields.place, "Mumbai");
        assert_eq!(fields.district, "Mumbai City");
        assert_eq!(fields.state, "Maharashtra");
        assert_eq!(fields.pincode, "400020");
    }
}
