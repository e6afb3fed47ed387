//! Custom parsing hook example

use std::collections::HashMap;

use anyhow::{bail, Context};
use envbind::{Engine, Parsable, Populate};
use tracing_subscriber::EnvFilter;

/// Log verbosity accepted as a name or a number.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Loud,
}

impl Parsable for Verbosity {
    fn parse_field(&mut self, value: &str) -> anyhow::Result<()> {
        *self = match value.to_ascii_lowercase().as_str() {
            "quiet" | "0" => Verbosity::Quiet,
            "normal" | "1" => Verbosity::Normal,
            "loud" | "2" => Verbosity::Loud,
            other => bail!("unknown verbosity {other:?}"),
        };
        Ok(())
    }
}

/// `host:port` pair.
#[derive(Debug, Default, Clone, PartialEq)]
struct Peer {
    host: String,
    port: u16,
}

impl Parsable for Peer {
    fn parse_field(&mut self, value: &str) -> anyhow::Result<()> {
        let (host, port) = value
            .rsplit_once(':')
            .with_context(|| format!("peer {value:?} is missing a port"))?;
        self.host = host.to_string();
        self.port = port.parse().context("invalid peer port")?;
        Ok(())
    }
}

envbind::parsable!(Verbosity, Peer);

#[derive(Debug, Default, Populate)]
struct Config {
    #[env("verbosity", default = "normal")]
    pub verbosity: Verbosity,

    // The hook runs once per element
    #[env("peers")]
    pub peers: Vec<Peer>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = HashMap::from([
        ("NODE_VERBOSITY".to_string(), "loud".to_string()),
        ("NODE_PEERS".to_string(), "10.0.0.1:7000,10.0.0.2:7000".to_string()),
    ]);
    let engine = Engine::with_source(source).with_prefix("NODE");

    let mut config = Config::default();
    engine.populate(&mut config)?;

    println!("Configuration loaded:");
    println!("  Verbosity: {:?}", config.verbosity);
    for peer in &config.peers {
        println!("  Peer: {}:{}", peer.host, peer.port);
    }

    Ok(())
}
