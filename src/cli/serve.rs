//! Serve command handler
//!
//! Runs the picker HTTP API in the foreground. Flags override the
//! `[server]` section of the config file for this run only.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Drop sessions left unused for this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub session_ttl: Option<u64>,

    /// Geocoder base URL (e.g. a self-hosted Nominatim)
    #[arg(long)]
    pub geocoder: Option<String>,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ttl) = self.session_ttl {
            config.server.session_ttl_secs = ttl;
        }
        if let Some(url) = self.geocoder {
            config.geocoder.url = url;
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server_addr(),
        session_ttl_secs = config.server.session_ttl_secs,
        "Starting location-picker server"
    );
    server::run(config).await
}
