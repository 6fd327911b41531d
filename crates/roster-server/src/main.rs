//! # Roster Server
//!
//! Loads configuration, initialises logging, wires MySQL and Redis into the
//! user service and serves the REST API.

use roster_config::ConfigLoader;
use roster_core::telemetry::init_telemetry;
use roster_core::RosterResult;
use roster_server::startup::{print_banner, print_startup_info};
use roster_server::Application;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be up yet if configuration failed
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> RosterResult<()> {
    let config = ConfigLoader::from_default_location().load()?;
    init_telemetry(&config.observability)?;

    print_banner();
    info!("Starting Roster Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    print_startup_info(&config);

    Application::build(config).await?.run().await
}
