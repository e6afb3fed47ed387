//! Basic usage example

use envbind::Populate;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Populate)]
#[env(prefix = "APP")]
struct Config {
    // Required field: loaded from APP_DATABASE_URL
    #[env("database_url,required")]
    pub database_url: String,

    // With default value
    #[env("server_addr", default = "127.0.0.1:8080")]
    pub server_addr: String,

    // Numeric type
    #[env("max_connections", default = "10")]
    pub max_connections: u32,

    // Boolean type
    #[env("debug_mode")]
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Set environment variables for demonstration
    std::env::set_var("APP_DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("APP_SERVER_ADDR", "0.0.0.0:3000");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);

    Ok(())
}
