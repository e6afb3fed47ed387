//! Integration tests

use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use envbind::{Engine, Error, HardwareAddr, Parsable, Populate, Snapshot};
use serial_test::serial;
use std::env;

fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn populate<T: Populate>(target: &mut T, prefix: &str, pairs: &[(&str, &str)]) -> Result<(), Error> {
    Engine::with_source(source(pairs))
        .with_prefix(prefix)
        .populate(target)
}

#[derive(Debug, Default, Populate)]
struct BasicConfig {
    #[env("name")]
    pub name: String,

    #[env("age")]
    pub age: i32,

    #[env("is_married")]
    pub is_married: bool,

    pub untagged: String,
}

#[test]
fn test_basic_config() {
    let mut config = BasicConfig::default();
    populate(
        &mut config,
        "APP",
        &[
            ("APP_NAME", "John"),
            ("APP_AGE", "30"),
            ("APP_IS_MARRIED", "true"),
            ("APP_UNTAGGED", "ignored"),
        ],
    )
    .unwrap();

    assert_eq!(config.name, "John");
    assert_eq!(config.age, 30);
    assert!(config.is_married);
    assert_eq!(config.untagged, "");
}

#[derive(Debug, Default, Populate)]
struct RequiredConfig {
    #[env("host")]
    pub host: String,

    #[env("port,required")]
    pub port: u16,

    #[env("mode,required", default = "release")]
    pub mode: String,
}

#[test]
fn test_missing_required_field() {
    let mut config = RequiredConfig::default();
    let err = populate(&mut config, "APP", &[("APP_HOST", "localhost")]).unwrap_err();

    assert!(matches!(err, Error::MissingRequired { ref key } if key == "APP_PORT"));
    assert_eq!(err.to_string(), "missing required environment variable: APP_PORT");
    // Fields before the failing one stay assigned
    assert_eq!(config.host, "localhost");
}

#[test]
fn test_empty_required_field() {
    let mut config = RequiredConfig::default();
    let err = populate(&mut config, "", &[("PORT", "")]).unwrap_err();
    assert!(matches!(err, Error::EmptyRequired { ref key } if key == "PORT"));
}

#[test]
fn test_required_with_default() {
    let mut config = RequiredConfig::default();
    populate(&mut config, "", &[("PORT", "80")]).unwrap();
    assert_eq!(config.port, 80);
    assert_eq!(config.mode, "release");

    populate(&mut config, "", &[("PORT", "80"), ("MODE", "debug")]).unwrap();
    assert_eq!(config.mode, "debug");
}

#[derive(Debug, Default, Populate)]
struct Geo {
    #[env("lat")]
    pub lat: f64,

    #[env("zone,omitprefix")]
    pub zone: String,
}

#[derive(Debug, Default, Populate)]
struct Address {
    #[env("city")]
    pub city: String,

    #[env("nested:geo")]
    pub geo: Geo,
}

#[derive(Debug, Default, Populate)]
struct Person {
    #[env("name")]
    pub name: String,

    #[env("nested:addr")]
    pub address: Address,

    #[env("prefix:work")]
    pub work: Option<Address>,

    pub home: Address,
}

#[test]
fn test_nested_with_prefix() {
    let mut person = Person::default();
    populate(
        &mut person,
        "APP",
        &[
            ("APP_NAME", "John"),
            ("APP_ADDR_CITY", "NYC"),
            ("APP_ADDR_GEO_LAT", "40.7"),
            ("APP_WORK_CITY", "Boston"),
        ],
    )
    .unwrap();

    assert_eq!(person.name, "John");
    assert_eq!(person.address.city, "NYC");
    assert_eq!(person.address.geo.lat, 40.7);
    assert_eq!(person.work.as_ref().map(|a| a.city.as_str()), Some("Boston"));
}

#[test]
fn test_untagged_nested_shares_prefix() {
    let mut person = Person::default();
    populate(&mut person, "APP", &[("APP_CITY", "Paris"), ("APP_GEO_LAT", "48.8")]).unwrap();

    assert_eq!(person.home.city, "Paris");
    assert_eq!(person.home.geo.lat, 48.8);
}

#[test]
fn test_nested_pointer_allocated_without_keys() {
    let mut person = Person::default();
    populate(&mut person, "APP", &[]).unwrap();
    assert!(person.work.is_some());
}

#[test]
fn test_omitprefix_at_any_depth() {
    let mut person = Person::default();
    populate(
        &mut person,
        "APP",
        &[("ZONE", "EST"), ("APP_ADDR_GEO_ZONE", "wrong")],
    )
    .unwrap();

    assert_eq!(person.address.geo.zone, "EST");
    assert_eq!(person.work.as_ref().map(|a| a.geo.zone.as_str()), Some("EST"));
}

#[derive(Debug, Default, Populate)]
struct Collections {
    #[env("nums")]
    pub nums: Vec<i32>,

    #[env("names")]
    pub names: Vec<String>,

    #[env("timeouts")]
    pub timeouts: Vec<Duration>,

    #[env("ports")]
    pub ports: Vec<Box<u16>>,

    #[env("labels", format = "json")]
    pub labels: HashMap<String, String>,

    #[env("weights", format = "yaml")]
    pub weights: BTreeMap<String, f32>,
}

#[test]
fn test_sequences_and_maps() {
    let mut config = Collections::default();
    populate(
        &mut config,
        "APP",
        &[
            ("APP_NUMS", "1,2,3"),
            ("APP_NAMES", "a, b ,c"),
            ("APP_TIMEOUTS", "1s,250ms"),
            ("APP_PORTS", "80,443"),
            ("APP_LABELS", r#"{"team":"core"}"#),
            ("APP_WEIGHTS", "a: 0.5\nb: 1.5\n"),
        ],
    )
    .unwrap();

    assert_eq!(config.nums, vec![1, 2, 3]);
    assert_eq!(config.names, vec!["a", "b", "c"]);
    assert_eq!(config.timeouts, vec![Duration::from_secs(1), Duration::from_millis(250)]);
    assert_eq!(config.ports, vec![Box::new(80), Box::new(443)]);
    assert_eq!(config.labels["team"], "core");
    assert_eq!(config.weights["b"], 1.5);
}

#[test]
fn test_sequence_element_out_of_range() {
    let mut config = Collections::default();
    let err = populate(&mut config, "APP", &[("APP_PORTS", "80,70000")]).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref key, .. } if key == "APP_PORTS"));
}

#[derive(Debug, Default, Populate)]
struct UnformattedMap {
    #[env("labels")]
    pub labels: HashMap<String, String>,
}

#[test]
fn test_map_without_format() {
    let mut config = UnformattedMap::default();
    let err = populate(&mut config, "", &[("LABELS", "{}")]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedShape { .. }));
}

#[derive(Debug, Default, PartialEq, serde::Deserialize)]
struct Limits {
    burst: u32,
    rate: f64,
}

envbind::structured!(Limits);

#[derive(Debug, Default, Populate)]
struct Structured {
    #[env("limits", format = "json")]
    pub limits: Limits,

    #[env("backup", format = "toml")]
    pub backup: Limits,
}

#[test]
fn test_structured_record() {
    let mut config = Structured::default();
    populate(&mut config, "", &[("LIMITS", r#"{"burst":5,"rate":0.5}"#)]).unwrap();
    assert_eq!(config.limits, Limits { burst: 5, rate: 0.5 });

    let err = populate(&mut config, "", &[("BACKUP", "burst = 1")]).unwrap_err();
    match err {
        Error::UnsupportedFormat { key, format, .. } => {
            assert_eq!(key, "BACKUP");
            assert_eq!(format, "toml");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[derive(Debug, Default, Populate)]
struct Scalars {
    #[env("timeout,required")]
    pub timeout: Duration,

    #[env("started")]
    pub started: Option<DateTime<FixedOffset>>,

    #[env("release", format = "time:%d/%m/%Y %H:%M,Europe/Paris")]
    pub release: Option<DateTime<Utc>>,

    #[env("zone")]
    pub zone: Option<chrono_tz::Tz>,

    #[env("endpoint")]
    pub endpoint: Option<url::Url>,

    #[env("bind")]
    pub bind: Option<IpAddr>,

    #[env("mac")]
    pub mac: Option<HardwareAddr>,
}

#[test]
fn test_recognized_scalars() {
    let mut config = Scalars::default();
    populate(
        &mut config,
        "APP",
        &[
            ("APP_TIMEOUT", "10s"),
            ("APP_STARTED", "2023-01-02T15:04:05Z"),
            ("APP_RELEASE", "01/01/2024 10:00"),
            ("APP_ZONE", "Asia/Tokyo"),
            ("APP_ENDPOINT", "https://example.com/api"),
            ("APP_BIND", "10.0.0.1"),
            ("APP_MAC", "00:00:5e:00:53:01"),
        ],
    )
    .unwrap();

    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(
        config.started,
        Some(Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap().fixed_offset())
    );
    assert_eq!(
        config.release,
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
    );
    assert_eq!(config.zone, Some(chrono_tz::Asia::Tokyo));
    assert_eq!(config.endpoint.as_ref().map(|u| u.host_str()), Some(Some("example.com")));
    assert_eq!(config.bind, Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
    assert_eq!(config.mac.map(|m| m.to_string()).as_deref(), Some("00:00:5e:00:53:01"));
}

#[test]
fn test_pointer_leaves_stay_empty_when_unset() {
    let mut config = Scalars::default();
    populate(&mut config, "APP", &[("APP_TIMEOUT", "1m")]).unwrap();

    assert!(config.started.is_none());
    assert!(config.zone.is_none());
    assert!(config.mac.is_none());
}

#[test]
fn test_bad_duration_is_conversion_failure() {
    let mut config = Scalars::default();
    let err = populate(&mut config, "APP", &[("APP_TIMEOUT", "soon")]).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref key, .. } if key == "APP_TIMEOUT"));
}

#[derive(Debug, Default, PartialEq)]
struct CustomTime {
    raw: String,
    time: Option<DateTime<FixedOffset>>,
}

impl Parsable for CustomTime {
    fn parse_field(&mut self, value: &str) -> anyhow::Result<()> {
        self.raw = value.to_string();
        self.time = Some(DateTime::parse_from_rfc3339(value)?);
        Ok(())
    }
}

/// Wraps a point in time but parses only `@<unix seconds>`.
#[derive(Debug, Default, PartialEq)]
struct Epoch(i64);

impl Parsable for Epoch {
    fn parse_field(&mut self, value: &str) -> anyhow::Result<()> {
        let seconds = value
            .strip_prefix('@')
            .ok_or_else(|| anyhow::anyhow!("epoch must start with '@'"))?;
        self.0 = seconds.parse()?;
        Ok(())
    }
}

envbind::parsable!(CustomTime, Epoch);

#[derive(Debug, Default, Populate)]
struct Hooked {
    #[env("start")]
    pub start: CustomTime,

    #[env("epochs")]
    pub epochs: Vec<Epoch>,

    #[env("deadline")]
    pub deadline: Option<Epoch>,
}

#[test]
fn test_custom_hook() {
    let mut config = Hooked::default();
    populate(
        &mut config,
        "APP",
        &[
            ("APP_START", "2023-01-02T15:04:05Z"),
            ("APP_EPOCHS", "@1,@2"),
            ("APP_DEADLINE", "@99"),
        ],
    )
    .unwrap();

    assert_eq!(config.start.raw, "2023-01-02T15:04:05Z");
    assert!(config.start.time.is_some());
    assert_eq!(config.epochs, vec![Epoch(1), Epoch(2)]);
    assert_eq!(config.deadline, Some(Epoch(99)));
}

#[test]
fn test_custom_hook_error_is_verbatim() {
    let mut config = Hooked::default();
    let err = populate(&mut config, "", &[("DEADLINE", "2024-01-01")]).unwrap_err();
    match err {
        Error::Conversion { key, source } => {
            assert_eq!(key, "DEADLINE");
            assert_eq!(source.to_string(), "epoch must start with '@'");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[derive(Debug, Default, Populate)]
struct Files {
    #[env("input")]
    pub input: Option<std::fs::File>,

    #[env("output", format = "file:wo|create|truncate,0600")]
    pub output: Option<std::fs::File>,
}

#[test]
fn test_file_handles() {
    use std::io::{Read, Write};

    let mut input = tempfile::NamedTempFile::new().unwrap();
    write!(input, "payload").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");

    let mut config = Files::default();
    populate(
        &mut config,
        "",
        &[
            ("INPUT", input.path().to_str().unwrap()),
            ("OUTPUT", output.to_str().unwrap()),
        ],
    )
    .unwrap();

    let mut contents = String::new();
    config.input.unwrap().read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "payload");

    config.output.unwrap().write_all(b"written").unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "written");
}

#[derive(Debug, Default, Populate)]
struct LogFile {
    #[env("log", format = "file:create,0644")]
    pub log: Option<std::fs::File>,
}

#[test]
fn test_read_only_file_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.log");

    let mut config = LogFile::default();
    populate(&mut config, "", &[("LOG", path.to_str().unwrap())]).unwrap();

    assert!(config.log.is_some());
    assert!(path.exists());
}

#[derive(Debug, Default, Populate)]
struct Ratios {
    #[env("wide")]
    pub wide: f64,

    #[env("narrow")]
    pub narrow: Option<f32>,
}

#[test]
fn test_float_overflow_is_conversion_failure() {
    let mut config = Ratios::default();
    let err = populate(&mut config, "", &[("WIDE", "1e400")]).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref key, .. } if key == "WIDE"));
    assert_eq!(config.wide, 0.0);

    let err = populate(&mut config, "", &[("NARROW", "1e400")]).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref key, .. } if key == "NARROW"));
    assert!(config.narrow.is_none());
}

#[test]
fn test_empty_slot_is_invalid_target() {
    let mut target: Option<BasicConfig> = None;
    let err = Engine::with_source(source(&[])).populate(&mut target).unwrap_err();
    assert!(matches!(err, Error::InvalidTarget { .. }));
    assert!(target.is_none());
}

#[test]
fn test_populate_with_explicit_prefix() {
    let engine = Engine::with_source(source(&[("OTHER_NAME", "Jane")])).with_prefix("APP");
    let mut config = BasicConfig::default();
    engine.populate_with_prefix(&mut config, "OTHER").unwrap();
    assert_eq!(config.name, "Jane");
    assert_eq!(engine.prefix(), "APP");
}

#[derive(Debug, Default, Populate)]
#[env(prefix = "SVC")]
struct ServiceConfig {
    #[env("database_url,required")]
    pub database_url: String,

    #[env("max_connections", default = "10")]
    pub max_connections: u32,
}

#[test]
#[serial]
fn test_from_env_uses_container_prefix() {
    env::set_var("SVC_DATABASE_URL", "postgres://localhost/test");
    env::remove_var("SVC_MAX_CONNECTIONS");

    let config = ServiceConfig::from_env().unwrap();
    assert_eq!(config.database_url, "postgres://localhost/test");
    assert_eq!(config.max_connections, 10);

    env::remove_var("SVC_DATABASE_URL");
}

#[test]
#[serial]
fn test_from_env_missing_required() {
    env::remove_var("SVC_DATABASE_URL");

    let result = ServiceConfig::from_env();
    assert!(matches!(result, Err(Error::MissingRequired { .. })));
}

#[test]
#[serial]
fn test_snapshot_source() {
    env::set_var("SNAP_DATABASE_URL", "postgres://snapshot");
    let engine = Engine::with_source(Snapshot::capture()).with_prefix("SNAP");
    env::remove_var("SNAP_DATABASE_URL");

    let mut config = ServiceConfig::default();
    engine.populate(&mut config).unwrap();
    assert_eq!(config.database_url, "postgres://snapshot");
}

#[test]
fn test_engine_is_reusable() {
    let engine = Engine::with_source(source(&[("APP_NAME", "John"), ("APP_AGE", "41")]))
        .with_prefix("APP");

    let mut first = BasicConfig::default();
    let mut second = BasicConfig::default();
    engine.populate(&mut first).unwrap();
    engine.populate(&mut second).unwrap();
    assert_eq!(first.age, second.age);
}
