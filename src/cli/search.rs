//! Search command handler
//!
//! One-shot forward search, printing the candidates a picker would offer.

use crate::config::Config;
use crate::error::Result;
use crate::geo::{get_geocoder, GeoBackend};
use crate::picker::search::is_searchable;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name, locality or address
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;

    let query = args.query.trim();
    if !is_searchable(query, config.search.min_query_chars) {
        eprintln!(
            "Error: Query must be at least {} characters",
            config.search.min_query_chars
        );
        std::process::exit(1);
    }

    let geocoder = get_geocoder(&config)?;
    let mut results = geocoder.search(query).await?;
    results.truncate(args.limit.unwrap_or(config.search.result_limit));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        match result.coordinates() {
            Ok(coords) => println!("{:>2}. {} ({})", i, result.display_name, coords),
            Err(_) => println!("{:>2}. {} (no coordinates)", i, result.display_name),
        }
    }
    Ok(())
}
