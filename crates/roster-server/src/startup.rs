//! Server startup utilities.

use roster_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ____             __
   / __ \____  _____/ /____  _____
  / /_/ / __ \/ ___/ __/ _ \/ ___/
 / _, _/ /_/ (__  ) /_/  __/ /
/_/ |_|\____/____/\__/\___/_/
    "#
    );
}

/// Lists the endpoints the server is about to expose.
pub fn print_startup_info(config: &AppConfig) {
    let base = format!("http://{}", config.server.addr());
    let prefix = config.server.api_prefix.trim_end_matches('/');
    let separator = "=".repeat(60);

    info!("{}", separator);
    info!("Users:     {}{}/users", base, prefix);
    info!("Health:    {}/health", base);
    info!("API Docs:  {}/swagger-ui", base);
    info!(
        "Cache:     {}",
        if config.redis.enabled {
            config.redis.url.as_str()
        } else {
            "disabled"
        }
    );
    info!("{}", separator);
}
