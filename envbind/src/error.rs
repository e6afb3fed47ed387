//! Error types for populating records from environment variables

use crate::shape::Shape;

/// Errors that abort a traversal.
///
/// The traversal is fail-fast: the first failing field produces the single
/// returned error, and fields assigned before it keep their values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The entry operation was handed an empty slot instead of a record.
    #[error("target must be a populated record: {reason}")]
    InvalidTarget {
        /// Why the target was rejected
        reason: String,
    },

    /// Required environment variable is not set and the field has no default.
    #[error("missing required environment variable: {key}")]
    MissingRequired {
        /// Resolved (upper-cased) environment variable name
        key: String,
    },

    /// Required environment variable is set to the empty string and the field
    /// has no default.
    #[error("empty required environment variable: {key}")]
    EmptyRequired {
        /// Resolved (upper-cased) environment variable name
        key: String,
    },

    /// The field's shape has no coercion path without a format option.
    #[error("environment variable {key}: no conversion for {shape} without a format option")]
    UnsupportedShape {
        /// Resolved (upper-cased) environment variable name
        key: String,
        /// Shape of the target
        shape: Shape,
    },

    /// A format option is present but does not apply to the field's shape.
    #[error("environment variable {key}: unsupported format {format:?} for {shape}")]
    UnsupportedFormat {
        /// Resolved (upper-cased) environment variable name
        key: String,
        /// Raw format option as written on the field
        format: String,
        /// Shape of the target
        shape: Shape,
    },

    /// The value could not be converted into the field's type.
    #[error("failed to parse environment variable {key}: {source}")]
    Conversion {
        /// Resolved (upper-cased) environment variable name
        key: String,
        /// Root cause reported by the coercer
        source: ValueError,
    },
}

impl Error {
    /// Attach the resolved key to a coercion failure.
    ///
    /// `NoDecoder` is lifted into `UnsupportedShape` when the field carries no
    /// format option and into `UnsupportedFormat` otherwise.
    pub(crate) fn from_value(key: String, format: &str, source: ValueError) -> Self {
        match source {
            ValueError::NoDecoder { shape } if format.trim().is_empty() => {
                Self::UnsupportedShape { key, shape }
            }
            ValueError::NoDecoder { shape } => Self::UnsupportedFormat {
                key,
                format: format.to_string(),
                shape,
            },
            source => Self::Conversion { key, source },
        }
    }

    /// Resolved environment variable name the error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidTarget { .. } => None,
            Self::MissingRequired { key }
            | Self::EmptyRequired { key }
            | Self::UnsupportedShape { key, .. }
            | Self::UnsupportedFormat { key, .. }
            | Self::Conversion { key, .. } => Some(key),
        }
    }
}

/// Root causes reported by the value coercers.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),

    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),

    /// The value is a valid float that does not fit the declared width.
    #[error("value {value:?} out of range for f{bits}")]
    FloatRange { value: String, bits: u32 },

    #[error("invalid boolean {value:?}")]
    Bool { value: String },

    #[error("invalid duration {value:?}: {reason}")]
    Duration { value: String, reason: &'static str },

    /// None of the accepted layouts matched. Only the value is reported.
    #[error("cannot parse {value:?} as a point in time")]
    Time { value: String },

    #[error("cannot parse {value:?} with layout {layout:?}: {source}")]
    TimeLayout {
        value: String,
        layout: String,
        source: chrono::ParseError,
    },

    #[error("unknown time zone {name:?}")]
    Location { name: String },

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("invalid IP address {value:?}")]
    IpAddr { value: String },

    #[error("invalid MAC address {value:?}")]
    HardwareAddr { value: String },

    #[error("cannot open file {path:?}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to unmarshal JSON to {shape}: {source}")]
    Json {
        shape: Shape,
        source: serde_json::Error,
    },

    #[error("failed to unmarshal YAML to {shape}: {source}")]
    Yaml {
        shape: Shape,
        source: serde_yaml::Error,
    },

    /// Error returned by a [`Parsable`](crate::Parsable) implementation.
    #[error(transparent)]
    Hook(anyhow::Error),

    /// No structured decoder was selected for a map or record.
    #[error("no decoder for {shape}")]
    NoDecoder { shape: Shape },
}
