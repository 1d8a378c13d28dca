//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod pick;
pub mod pincode;
pub mod reverse;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use crate::geo::get_geocoder;
use crate::geo::nominatim::NominatimBackend;
use crate::location::Location;
use crate::picker::{PickerSession, PickerSettings};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Location search and resolution for pincode-based address forms
#[derive(Parser)]
#[command(name = "location-picker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a place by name
    Search(search::SearchArgs),

    /// Resolve a point to its address fields
    Reverse(reverse::ReverseArgs),

    /// Resolve a pincode to a location
    Pincode(pincode::PincodeArgs),

    /// Pick a location interactively
    Pick(pick::PickArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Pincode(args) => pincode::run(args).await,
        Commands::Pick(args) => pick::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Log to stderr, `info` unless RUST_LOG says otherwise
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Open a picker session against the configured geocoder
fn open_session(
    config: &Config,
    initial: Option<Location>,
) -> Result<PickerSession<NominatimBackend>> {
    let backend = Arc::new(get_geocoder(config)?);
    let settings = PickerSettings::from(&config.search);
    match initial {
        Some(location) => PickerSession::with_initial(backend, settings, location),
        None => Ok(PickerSession::new(backend, settings)),
    }
}

/// Print a location either as JSON or as labelled fields
fn print_location(location: &Location, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(location)?);
        return Ok(());
    }

    println!("Place:       {}", location.place);
    println!("District:    {}", location.district);
    println!("State:       {}", location.state);
    println!("Pincode:     {}", location.pincode);
    println!("Coordinates: {}", location.coordinates);
    Ok(())
}
