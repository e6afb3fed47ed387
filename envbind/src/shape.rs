//! Structural identity of leaf values.

use std::fmt;

/// The closed set of shapes a leaf field can take.
///
/// Every [`EnvValue`](crate::EnvValue) reports its shape once per type. The
/// traversal uses it to select how the format option is read and to name the
/// target in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Text, copied verbatim.
    Text,
    /// Signed integer of the given bit width.
    Int(u32),
    /// Unsigned integer of the given bit width.
    Uint(u32),
    /// Floating point number of the given bit width.
    Float(u32),
    /// Boolean literal.
    Bool,
    /// Duration literal such as `10s` or `1h30m`.
    Duration,
    /// Comma-separated sequence of the inner shape.
    Sequence(Box<Shape>),
    /// Associative value decoded as a whole by a structured decoder.
    Map,
    /// Record decoded as a whole by a structured decoder.
    Struct,
    /// Point in time.
    Time,
    /// Time zone looked up by name.
    Location,
    /// Parsed URL.
    Url,
    /// IP address parsed from the whole value.
    IpAddr,
    /// Hardware (MAC) address parsed from the whole value.
    HardwareAddr,
    /// File handle opened from a path.
    File,
    /// Optional or boxed slot around the inner shape.
    Pointer(Box<Shape>),
    /// Type that parses itself through [`Parsable`](crate::Parsable).
    Custom,
}

impl Shape {
    /// Shape with pointer layers removed.
    pub fn deref(&self) -> &Shape {
        match self {
            Shape::Pointer(inner) => inner.deref(),
            other => other,
        }
    }

    /// Shape the format option applies to: pointers and sequences are looked
    /// through down to their element.
    pub fn element(&self) -> &Shape {
        match self {
            Shape::Pointer(inner) | Shape::Sequence(inner) => inner.element(),
            other => other,
        }
    }

    /// Whether sequence elements of this shape are whitespace-trimmed.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.deref(),
            Shape::Text
                | Shape::Int(_)
                | Shape::Uint(_)
                | Shape::Float(_)
                | Shape::Bool
                | Shape::Duration
        )
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Text => f.write_str("text"),
            Shape::Int(bits) => write!(f, "i{bits}"),
            Shape::Uint(bits) => write!(f, "u{bits}"),
            Shape::Float(bits) => write!(f, "f{bits}"),
            Shape::Bool => f.write_str("bool"),
            Shape::Duration => f.write_str("duration"),
            Shape::Sequence(inner) => write!(f, "[{inner}]"),
            Shape::Map => f.write_str("map"),
            Shape::Struct => f.write_str("struct"),
            Shape::Time => f.write_str("time"),
            Shape::Location => f.write_str("location"),
            Shape::Url => f.write_str("url"),
            Shape::IpAddr => f.write_str("ip address"),
            Shape::HardwareAddr => f.write_str("hardware address"),
            Shape::File => f.write_str("file"),
            Shape::Pointer(inner) => write!(f, "*{inner}"),
            Shape::Custom => f.write_str("custom"),
        }
    }
}
