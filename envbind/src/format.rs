//! Format-option grammar.
//!
//! The same option string means different things depending on the shape of
//! the target it is attached to:
//!
//! ```text
//! time:<layout>[,<location>]                     point in time
//! file:<token>[|<token>...][,<octal-permissions>] file handle
//! json | yaml                                     maps and records
//! ```

use crate::shape::Shape;

/// Parsed format option, selected by the target's shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormatOptions<'a> {
    /// No option applies to the target.
    #[default]
    None,
    Time(TimeFormat<'a>),
    File(FileFormat),
    Encoding(Encoding),
}

/// Explicit layout and location for points in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeFormat<'a> {
    /// `strftime`-style layout. Empty means the fallback layouts are tried.
    pub layout: &'a str,
    /// Time zone name. Empty means UTC.
    pub location: &'a str,
}

/// Access mode of an opened file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// Open flags and permissions for file handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFormat {
    pub access: Access,
    pub create: bool,
    pub truncate: bool,
    pub append: bool,
    /// Permission bits used when the file is created.
    pub permissions: u32,
}

impl Default for FileFormat {
    fn default() -> Self {
        Self {
            access: Access::ReadOnly,
            create: false,
            truncate: false,
            append: false,
            permissions: 0o666,
        }
    }
}

/// Structured decoder for maps and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Yaml,
}

impl<'a> FormatOptions<'a> {
    /// Parse `raw` for a target of the given shape.
    ///
    /// Never fails: an option that does not apply to the shape yields
    /// [`FormatOptions::None`], and the coercer decides whether that is an
    /// error.
    pub fn parse(raw: &'a str, shape: &Shape) -> Self {
        let raw = raw.trim();
        match shape.element() {
            Shape::Time => match raw.strip_prefix("time:") {
                Some(rest) => Self::Time(parse_time(rest)),
                None => Self::None,
            },
            Shape::File => Self::File(raw.strip_prefix("file:").map(parse_file).unwrap_or_default()),
            Shape::Map | Shape::Struct => match raw {
                "json" => Self::Encoding(Encoding::Json),
                "yaml" => Self::Encoding(Encoding::Yaml),
                _ => Self::None,
            },
            _ => Self::None,
        }
    }

    pub fn time(&self) -> TimeFormat<'a> {
        match self {
            Self::Time(format) => format.clone(),
            _ => TimeFormat::default(),
        }
    }

    pub fn file(&self) -> FileFormat {
        match self {
            Self::File(format) => *format,
            _ => FileFormat::default(),
        }
    }

    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            Self::Encoding(encoding) => Some(*encoding),
            _ => None,
        }
    }
}

fn parse_time(rest: &str) -> TimeFormat<'_> {
    let mut parts = rest.split(',').map(str::trim);
    TimeFormat {
        layout: parts.next().unwrap_or_default(),
        location: parts.next().unwrap_or_default(),
    }
}

fn parse_file(rest: &str) -> FileFormat {
    let mut format = FileFormat::default();
    for token in rest.split(',').flat_map(|part| part.split('|')).map(str::trim) {
        match token {
            "ro" => format.access = Access::ReadOnly,
            "wo" => format.access = Access::WriteOnly,
            "rw" => format.access = Access::ReadWrite,
            "create" => format.create = true,
            "truncate" => format.truncate = true,
            "append" => format.append = true,
            other => {
                if let Ok(permissions) = u32::from_str_radix(other, 8) {
                    format.permissions = permissions;
                }
            }
        }
    }
    format
}
