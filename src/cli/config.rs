//! Config command handler
//!
//! Prints or edits `config.toml` by dotted key.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key such as "search.debounce_ms"
    pub key: Option<String>,

    /// New value for the key (omit to print the current value)
    #[arg(requires = "key")]
    pub value: Option<String>,

    /// Print the config file location
    #[arg(long, conflicts_with_all = ["key", "reset", "keys"])]
    pub path: bool,

    /// Overwrite the config file with defaults
    #[arg(long, conflicts_with_all = ["key", "keys"])]
    pub reset: bool,

    /// List settable keys
    #[arg(long, conflicts_with = "key")]
    pub keys: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }
    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }
    if args.keys {
        for key in Config::available_keys() {
            println!("{}", key);
        }
        return Ok(());
    }

    let mut config = Config::load()?;
    let Some(key) = args.key else {
        show_all_config(&config);
        return Ok(());
    };

    match args.value {
        Some(value) => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }
        None => {
            let value = config.get(&key).ok_or_else(|| {
                Error::Config(format!(
                    "Unknown config key: {} (run with --keys to list them)",
                    key
                ))
            })?;
            println!("{}", value);
        }
    }
    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[search]");
    println!("debounce_ms = {}", config.search.debounce_ms);
    println!("min_query_chars = {}", config.search.min_query_chars);
    println!("result_limit = {}", config.search.result_limit);
    println!();

    println!("[geocoder]");
    println!("url = \"{}\"", config.geocoder.url);
    println!("user_agent = \"{}\"", config.geocoder.user_agent);
    println!("country_codes = \"{}\"", config.geocoder.country_codes);
    println!("timeout_secs = {}", config.geocoder.timeout_secs);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!("session_ttl_secs = {}", config.server.session_ttl_secs);
}
