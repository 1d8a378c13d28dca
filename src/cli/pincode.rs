//! Pincode command handler

use crate::cli::{open_session, print_location};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::picker::Phase;
use clap::Args;

/// Pincode command arguments
#[derive(Args)]
pub struct PincodeArgs {
    /// Postal code to look up
    pub pincode: String,

    /// Print the location as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the pincode command
pub async fn run(args: PincodeArgs) -> Result<()> {
    let config = Config::load()?;
    let picker = open_session(&config, None)?;

    let handle = picker.lookup_pincode(&args.pincode).await?;
    handle
        .await
        .map_err(|e| Error::Server(format!("Pincode lookup task failed: {}", e)))?;

    if picker.phase().await != Phase::Resolved {
        eprintln!("Error: No location found for pincode '{}'", args.pincode.trim());
        std::process::exit(1);
    }
    print_location(&picker.location().await, args.json)
}
