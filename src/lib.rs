//! location-picker: location search and resolution for address forms
//!
//! Reconciles free-text search, map clicks, pincode lookups and manual field
//! edits into one consistent `Location`, debouncing searches and dropping
//! stale geocoder replies.
//!
//! ## Features
//!
//! - Debounced forward search with a minimum query length
//! - Reverse geocoding of map points with field fallback rules
//! - Pincode lookup and manual field edits
//! - Request sequencing so late replies never overwrite newer state
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```no_run
//! use location_picker::geo::get_geocoder;
//! use location_picker::picker::{PickerSession, PickerSettings};
//! use location_picker::Config;
//! use std::sync::Arc;
//!
//! # async fn demo() -> location_picker::Result<()> {
//! let config = Config::default();
//! let backend = Arc::new(get_geocoder(&config)?);
//! let picker = PickerSession::new(backend, PickerSettings::from(&config.search));
//!
//! // A map click sets coordinates at once; address fields follow
//! picker.select_point(19.076, 72.8777).await?.await.ok();
//! let location = picker.confirm().await?;
//! println!("Picked: {}", location);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod location;
pub mod picker;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use location::{Coordinates, Location, LocationPatch};
pub use picker::{Phase, PickerSession, PickerSnapshot};
