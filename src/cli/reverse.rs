//! Reverse command handler
//!
//! Resolves a point the way a map click in the picker would.

use crate::cli::{open_session, print_location};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::picker::Phase;
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print the location as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;
    let picker = open_session(&config, None)?;

    let handle = picker.select_point(args.lat, args.lng).await?;
    handle
        .await
        .map_err(|e| Error::Server(format!("Reverse geocoding task failed: {}", e)))?;

    let location = picker.location().await;
    if picker.phase().await == Phase::Resolved && location.has_no_text() && !args.json {
        eprintln!("No address found; only coordinates are set");
    }
    print_location(&location, args.json)
}
