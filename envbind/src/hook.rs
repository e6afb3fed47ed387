//! Custom conversion hook.

/// Self-parsing capability for types the engine does not know about.
///
/// A type registered with [`parsable!`](crate::parsable) is converted only
/// through [`Parsable::parse_field`], with priority over every built-in
/// conversion, wherever it appears: as a field, a sequence element or behind
/// an `Option`/`Box`. The hook's error is reported verbatim.
///
/// ```rust
/// use envbind::{Parsable, Populate};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct ByteSize(u64);
///
/// impl Parsable for ByteSize {
///     fn parse_field(&mut self, value: &str) -> anyhow::Result<()> {
///         let (digits, scale) = match value.strip_suffix("KiB") {
///             Some(digits) => (digits, 1024),
///             None => (value, 1),
///         };
///         self.0 = digits.trim().parse::<u64>()? * scale;
///         Ok(())
///     }
/// }
///
/// envbind::parsable!(ByteSize);
///
/// #[derive(Debug, Default, Populate)]
/// struct Config {
///     #[env("buffer")]
///     buffer: ByteSize,
/// }
///
/// # fn main() -> Result<(), envbind::Error> {
/// let source = std::collections::HashMap::from([("BUFFER".to_string(), "4KiB".to_string())]);
/// let mut config = Config::default();
/// envbind::Engine::with_source(source).populate(&mut config)?;
/// assert_eq!(config.buffer, ByteSize(4096));
/// # Ok(())
/// # }
/// ```
pub trait Parsable: Default {
    /// Parse `value` and update `self` accordingly.
    fn parse_field(&mut self, value: &str) -> anyhow::Result<()>;
}

/// Run the hook on a fresh instance.
#[doc(hidden)]
pub fn parse_with_hook<T: Parsable>(raw: &str) -> Result<T, crate::ValueError> {
    let mut value = T::default();
    value.parse_field(raw).map_err(crate::ValueError::Hook)?;
    Ok(value)
}

/// Register [`Parsable`] types with the engine.
///
/// Implements [`EnvValue`](crate::EnvValue) with
/// [`Shape::Custom`](crate::Shape::Custom) for each listed type, routing every
/// conversion through the hook.
#[macro_export]
macro_rules! parsable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::EnvValue for $ty {
                fn shape() -> $crate::Shape {
                    $crate::Shape::Custom
                }

                fn coerce(
                    raw: &str,
                    _format: &$crate::FormatOptions<'_>,
                ) -> ::std::result::Result<Self, $crate::ValueError> {
                    $crate::hook::parse_with_hook::<$ty>(raw)
                }
            }
        )+
    };
}
