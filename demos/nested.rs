//! Nested records and prefixes

use std::collections::HashMap;

use envbind::{Engine, Populate};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Populate)]
struct Database {
    #[env("host", default = "localhost")]
    pub host: String,

    #[env("port", default = "5432")]
    pub port: u16,
}

#[derive(Debug, Default, Populate)]
struct Logging {
    // Shared by every service, read without prefix
    #[env("log_level,omitprefix", default = "info")]
    pub level: String,
}

#[derive(Debug, Default, Populate)]
struct Config {
    #[env("name")]
    pub name: String,

    // Keys under APP_DB_*
    #[env("nested:db")]
    pub database: Database,

    // Allocated even when no APP_REPLICA_* key is set
    #[env("prefix:replica")]
    pub replica: Option<Database>,

    // Untagged record: keys share the parent prefix
    pub logging: Logging,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = HashMap::from([
        ("APP_NAME".to_string(), "inventory".to_string()),
        ("APP_DB_HOST".to_string(), "db.internal".to_string()),
        ("APP_REPLICA_PORT".to_string(), "6432".to_string()),
        ("LOG_LEVEL".to_string(), "debug".to_string()),
    ]);

    let mut config = Config::default();
    Engine::with_source(source)
        .with_prefix("APP")
        .populate(&mut config)?;

    println!("Configuration loaded:");
    println!("  Name: {}", config.name);
    println!("  Database: {}:{}", config.database.host, config.database.port);
    if let Some(replica) = &config.replica {
        println!("  Replica: {}:{}", replica.host, replica.port);
    }
    println!("  Log Level: {}", config.logging.level);

    Ok(())
}
