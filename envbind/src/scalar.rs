//! Specially recognized structured scalars: points in time, time zones, URLs,
//! IP and hardware addresses, and open files.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::error::ValueError;
use crate::format::{Access, FileFormat, FormatOptions, TimeFormat};
use crate::shape::Shape;
use crate::value::EnvValue;

enum Layout {
    Rfc3339,
    Rfc2822,
    /// Layout that carries its own offset.
    Offset(&'static str),
    /// Date and time interpreted in the configured location.
    Naive(&'static str),
    /// Date at midnight in the configured location.
    Date(&'static str),
}

/// Layouts tried, in order, when no explicit layout is configured. The first
/// one that parses wins.
const FALLBACK_LAYOUTS: [Layout; 7] = [
    Layout::Rfc3339,
    Layout::Rfc2822,
    Layout::Offset("%Y-%m-%d %H:%M:%S%.f %z"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%d %H:%M"),
    Layout::Date("%Y-%m-%d"),
];

/// Parse a point in time using the layout and location of `format`.
///
/// With an explicit layout the value must match it; a layout without an
/// offset is interpreted in the location (UTC when none is given). Without a
/// layout, [`FALLBACK_LAYOUTS`] are tried in order.
pub fn parse_time(raw: &str, format: &TimeFormat<'_>) -> Result<DateTime<FixedOffset>, ValueError> {
    let tz = location(format.location)?;

    if !format.layout.is_empty() {
        return parse_with_layout(raw, format.layout, tz);
    }

    FALLBACK_LAYOUTS
        .iter()
        .find_map(|layout| parse_fallback(raw, layout, tz))
        .ok_or_else(|| ValueError::Time {
            value: raw.to_string(),
        })
}

fn parse_with_layout(raw: &str, layout: &str, tz: Tz) -> Result<DateTime<FixedOffset>, ValueError> {
    let layout_error = |source| ValueError::TimeLayout {
        value: raw.to_string(),
        layout: layout.to_string(),
        source,
    };

    match DateTime::parse_from_str(raw, layout) {
        Ok(time) => return Ok(time),
        Err(err) if err.kind() != ParseErrorKind::NotEnough => return Err(layout_error(err)),
        Err(_) => {}
    }

    let naive = match NaiveDateTime::parse_from_str(raw, layout) {
        Ok(naive) => naive,
        Err(err) if err.kind() == ParseErrorKind::NotEnough => NaiveDate::parse_from_str(raw, layout)
            .map_err(layout_error)?
            .and_time(chrono::NaiveTime::MIN),
        Err(err) => return Err(layout_error(err)),
    };
    localize(raw, naive, tz)
}

fn parse_fallback(raw: &str, layout: &Layout, tz: Tz) -> Option<DateTime<FixedOffset>> {
    match layout {
        Layout::Rfc3339 => DateTime::parse_from_rfc3339(raw).ok(),
        Layout::Rfc2822 => DateTime::parse_from_rfc2822(raw).ok(),
        Layout::Offset(layout) => DateTime::parse_from_str(raw, layout).ok(),
        Layout::Naive(layout) => NaiveDateTime::parse_from_str(raw, layout)
            .ok()
            .and_then(|naive| localize(raw, naive, tz).ok()),
        Layout::Date(layout) => NaiveDate::parse_from_str(raw, layout)
            .ok()
            .and_then(|date| localize(raw, date.and_time(chrono::NaiveTime::MIN), tz).ok()),
    }
}

fn localize(raw: &str, naive: NaiveDateTime, tz: Tz) -> Result<DateTime<FixedOffset>, ValueError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|time| time.fixed_offset())
        .ok_or_else(|| ValueError::Time {
            value: raw.to_string(),
        })
}

/// Look up a time zone by name. An empty name is UTC.
pub fn location(name: &str) -> Result<Tz, ValueError> {
    if name.is_empty() {
        return Ok(Tz::UTC);
    }
    name.parse::<Tz>().map_err(|_| ValueError::Location {
        name: name.to_string(),
    })
}

impl EnvValue for DateTime<FixedOffset> {
    fn shape() -> Shape {
        Shape::Time
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        parse_time(raw, &format.time())
    }
}

impl EnvValue for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::Time
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        parse_time(raw, &format.time()).map(|time| time.with_timezone(&Utc))
    }
}

/// Wall-clock time in the configured location.
impl EnvValue for NaiveDateTime {
    fn shape() -> Shape {
        Shape::Time
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        parse_time(raw, &format.time()).map(|time| time.naive_local())
    }
}

impl EnvValue for Tz {
    fn shape() -> Shape {
        Shape::Location
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        location(raw)
    }
}

impl EnvValue for Url {
    fn shape() -> Shape {
        Shape::Url
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        Ok(Url::parse(raw)?)
    }
}

macro_rules! impl_env_value_ip {
    ($($ty:ty),*) => {
        $(
            /// Parsed from the whole value; never split into a sequence.
            impl EnvValue for $ty {
                fn shape() -> Shape {
                    Shape::IpAddr
                }

                fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
                    raw.parse().map_err(|_| ValueError::IpAddr {
                        value: raw.to_string(),
                    })
                }
            }
        )*
    };
}

impl_env_value_ip!(IpAddr, Ipv4Addr, Ipv6Addr);

/// Link-layer hardware address: EUI-48, EUI-64 or a 20-octet IP over
/// InfiniBand address.
///
/// Accepted forms:
///
/// ```text
/// 00:00:5e:00:53:01
/// 00-00-5e-00-53-01
/// 0000.5e00.5301
/// 02:00:5e:10:00:00:00:01
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HardwareAddr(Vec<u8>);

impl HardwareAddr {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

fn valid_octet_count(n: usize) -> bool {
    matches!(n, 6 | 8 | 20)
}

fn hex_octet(s: &str) -> Option<u8> {
    if s.len() != 2 {
        return None;
    }
    u8::from_str_radix(s, 16).ok()
}

impl FromStr for HardwareAddr {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::HardwareAddr {
            value: s.to_string(),
        };
        if s.len() < 14 || !s.is_ascii() {
            return Err(invalid());
        }

        let bytes = s.as_bytes();
        let octets = if bytes[2] == b':' || bytes[2] == b'-' {
            let sep = bytes[2] as char;
            let parts: Vec<&str> = s.split(sep).collect();
            if !valid_octet_count(parts.len()) {
                return Err(invalid());
            }
            parts
                .iter()
                .map(|part| hex_octet(part))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(invalid)?
        } else if bytes[4] == b'.' {
            let groups: Vec<&str> = s.split('.').collect();
            if !valid_octet_count(groups.len() * 2) || groups.iter().any(|g| g.len() != 4) {
                return Err(invalid());
            }
            groups
                .iter()
                .flat_map(|group| [&group[..2], &group[2..]])
                .map(hex_octet)
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(invalid)?
        } else {
            return Err(invalid());
        };
        Ok(Self(octets))
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{octet:02x}")?;
        }
        Ok(())
    }
}

/// Parsed from the whole value; never split into a sequence.
impl EnvValue for HardwareAddr {
    fn shape() -> Shape {
        Shape::HardwareAddr
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        raw.parse()
    }
}

/// Open `path` with the flags and permissions of `format`.
///
/// A read-only handle with `create` or `truncate` first prepares the file
/// through a write-capable handle, then reopens it for reading.
///
/// The handle stays open in the populated field; the caller owns it.
pub fn open_file(path: &str, format: &FileFormat) -> Result<File, ValueError> {
    let file_error = |source| ValueError::File {
        path: path.to_string(),
        source,
    };

    if format.access == Access::ReadOnly && (format.create || format.truncate) {
        let mut prepare = OpenOptions::new();
        prepare
            .write(true)
            .create(format.create)
            .truncate(format.truncate);
        with_permissions(&mut prepare, format.permissions);
        prepare.open(path).map_err(file_error)?;

        return OpenOptions::new().read(true).open(path).map_err(file_error);
    }

    let mut options = OpenOptions::new();
    match format.access {
        Access::ReadOnly => options.read(true),
        Access::WriteOnly => options.write(true),
        Access::ReadWrite => options.read(true).write(true),
    };
    options
        .create(format.create)
        .truncate(format.truncate)
        .append(format.append);
    with_permissions(&mut options, format.permissions);

    options.open(path).map_err(file_error)
}

#[cfg(unix)]
fn with_permissions(options: &mut OpenOptions, permissions: u32) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(permissions);
}

#[cfg(not(unix))]
fn with_permissions(_options: &mut OpenOptions, _permissions: u32) {}

impl EnvValue for File {
    fn shape() -> Shape {
        Shape::File
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        open_file(raw, &format.file())
    }
}
