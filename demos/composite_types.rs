//! Sequences, maps, time, network and file values

use std::collections::HashMap;
use std::io::Read;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use envbind::{Engine, HardwareAddr, Populate};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, serde::Deserialize)]
struct Limits {
    pub burst: u32,
    pub rate: f64,
}

envbind::structured!(Limits);

#[derive(Debug, Default, Populate)]
struct Config {
    #[env("ports")]
    pub ports: Vec<u16>,

    #[env("timeout", default = "1m30s")]
    pub timeout: Duration,

    #[env("labels", format = "json")]
    pub labels: HashMap<String, String>,

    #[env("limits", format = "yaml")]
    pub limits: Limits,

    #[env("started", format = "time:%Y-%m-%d %H:%M,Europe/Berlin")]
    pub started: Option<DateTime<Utc>>,

    #[env("zone")]
    pub zone: Option<chrono_tz::Tz>,

    #[env("endpoint")]
    pub endpoint: Option<url::Url>,

    #[env("bind")]
    pub bind: Option<IpAddr>,

    #[env("mac")]
    pub mac: Option<HardwareAddr>,

    #[env("motd", format = "file:ro")]
    pub motd: Option<std::fs::File>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let motd = std::env::temp_dir().join("envbind-motd.txt");
    std::fs::write(&motd, "hello from a file")?;

    let source: HashMap<String, String> = [
        ("PORTS", "80, 443"),
        ("LABELS", r#"{"team":"core","tier":"1"}"#),
        ("LIMITS", "burst: 20\nrate: 2.5\n"),
        ("STARTED", "2024-03-01 09:30"),
        ("ZONE", "Asia/Tokyo"),
        ("ENDPOINT", "https://api.example.com/v1"),
        ("BIND", "::1"),
        ("MAC", "00-00-5E-00-53-01"),
        ("MOTD", motd.to_str().unwrap_or_default()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut config = Config::default();
    Engine::with_source(source).populate(&mut config)?;

    println!("Configuration loaded:");
    println!("  Ports: {:?}", config.ports);
    println!("  Timeout: {:?}", config.timeout);
    println!("  Labels: {:?}", config.labels);
    println!("  Limits: {:?}", config.limits);
    println!("  Started: {:?}", config.started);
    println!("  Zone: {:?}", config.zone);
    println!("  Endpoint: {:?}", config.endpoint.map(|url| url.to_string()));
    println!("  Bind: {:?}", config.bind);
    println!("  MAC: {:?}", config.mac.map(|mac| mac.to_string()));

    if let Some(mut file) = config.motd {
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        println!("  MOTD: {contents}");
    }

    std::fs::remove_file(motd)?;
    Ok(())
}
