//! Shape dispatch for leaf values.
//!
//! [`EnvValue`] is implemented once per supported type and pairs the type's
//! [`Shape`] with the conversion from a raw string. Composite impls
//! (sequences, pointers, maps) recurse into their element's impl, so nested
//! shapes such as `Vec<Option<Vec<u8>>>` resolve without extra code.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::coerce;
use crate::decode;
use crate::error::ValueError;
use crate::format::FormatOptions;
use crate::shape::Shape;

/// A type that can be assigned from a single environment value.
pub trait EnvValue: Sized {
    /// Structural identity of the type.
    fn shape() -> Shape;

    /// Convert a raw value. `format` has already been selected for
    /// [`Self::shape`].
    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError>;
}

impl EnvValue for String {
    fn shape() -> Shape {
        Shape::Text
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        Ok(raw.to_string())
    }
}

impl EnvValue for PathBuf {
    fn shape() -> Shape {
        Shape::Text
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        Ok(PathBuf::from(raw))
    }
}

macro_rules! impl_env_value_integer {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl EnvValue for $ty {
                fn shape() -> Shape {
                    Shape::$variant(<$ty>::BITS)
                }

                fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
                    coerce::integer::<$ty>(raw)
                }
            }
        )*
    };
}

impl_env_value_integer!(Int: i8, i16, i32, i64, isize);
impl_env_value_integer!(Uint: u8, u16, u32, u64, usize);

impl EnvValue for f32 {
    fn shape() -> Shape {
        Shape::Float(32)
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        coerce::float32(raw)
    }
}

impl EnvValue for f64 {
    fn shape() -> Shape {
        Shape::Float(64)
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        coerce::float64(raw)
    }
}

impl EnvValue for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        coerce::boolean(raw)
    }
}

impl EnvValue for Duration {
    fn shape() -> Shape {
        Shape::Duration
    }

    fn coerce(raw: &str, _format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        coerce::duration(raw)
    }
}

/// Comma-separated sequence. Elements of primitive shape are trimmed; every
/// element is coerced by its own shape, in order.
impl<T: EnvValue> EnvValue for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        let trim = T::shape().is_primitive();
        raw.split(',')
            .map(|element| {
                let element = if trim { element.trim() } else { element };
                T::coerce(element, format)
            })
            .collect()
    }
}

/// Pointer slot. The traversal only assigns it when a value is resolved, so
/// an unresolved field keeps `None`.
impl<T: EnvValue> EnvValue for Option<T> {
    fn shape() -> Shape {
        Shape::Pointer(Box::new(T::shape()))
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        T::coerce(raw, format).map(Some)
    }
}

impl<T: EnvValue> EnvValue for Box<T> {
    fn shape() -> Shape {
        Shape::Pointer(Box::new(T::shape()))
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        T::coerce(raw, format).map(Box::new)
    }
}

impl<K, V, S> EnvValue for HashMap<K, V, S>
where
    K: DeserializeOwned + Eq + Hash,
    V: DeserializeOwned,
    S: BuildHasher + Default,
{
    fn shape() -> Shape {
        Shape::Map
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        decode::structured(raw, format, Shape::Map)
    }
}

impl<K, V> EnvValue for BTreeMap<K, V>
where
    K: DeserializeOwned + Ord,
    V: DeserializeOwned,
{
    fn shape() -> Shape {
        Shape::Map
    }

    fn coerce(raw: &str, format: &FormatOptions<'_>) -> Result<Self, ValueError> {
        decode::structured(raw, format, Shape::Map)
    }
}

/// Register records that are decoded as a whole by the `json` or `yaml`
/// format option.
///
/// Without one of those options the field fails with an unsupported-shape
/// error.
///
/// ```rust
/// use envbind::Populate;
///
/// #[derive(Debug, Default, serde::Deserialize)]
/// struct Limits {
///     burst: u32,
/// }
///
/// envbind::structured!(Limits);
///
/// #[derive(Debug, Default, Populate)]
/// struct Config {
///     #[env("limits", format = "json")]
///     limits: Limits,
/// }
/// ```
#[macro_export]
macro_rules! structured {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::EnvValue for $ty {
                fn shape() -> $crate::Shape {
                    $crate::Shape::Struct
                }

                fn coerce(
                    raw: &str,
                    format: &$crate::FormatOptions<'_>,
                ) -> ::std::result::Result<Self, $crate::ValueError> {
                    $crate::decode::structured(raw, format, $crate::Shape::Struct)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Encoding;

    fn none() -> FormatOptions<'static> {
        FormatOptions::None
    }

    #[test]
    fn test_integer_sequence() {
        let v: Vec<i32> = EnvValue::coerce("1,2,3", &none()).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_text_sequence_is_trimmed() {
        let v: Vec<String> = EnvValue::coerce("a, b ,c", &none()).unwrap();
        assert_eq!(v, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_text_sequence_round_trip() {
        let xs = vec!["alpha".to_string(), "beta".into(), "gamma".into()];
        let v: Vec<String> = EnvValue::coerce(&xs.join(","), &none()).unwrap();
        assert_eq!(v, xs);
    }

    #[test]
    fn test_empty_value_is_one_element() {
        let v: Vec<String> = EnvValue::coerce("", &none()).unwrap();
        assert_eq!(v, vec![String::new()]);
    }

    #[test]
    fn test_sequence_fails_on_bad_element() {
        let result: Result<Vec<u8>, _> = EnvValue::coerce("1,300,3", &none());
        assert!(matches!(result, Err(ValueError::Int(_))));
    }

    #[test]
    fn test_pointer_elements_are_allocated_per_element() {
        let v: Vec<Box<u16>> = EnvValue::coerce("4, 5", &none()).unwrap();
        assert_eq!(v, vec![Box::new(4), Box::new(5)]);

        let v: Vec<Option<bool>> = EnvValue::coerce("true,0", &none()).unwrap();
        assert_eq!(v, vec![Some(true), Some(false)]);
    }

    #[test]
    fn test_nested_sequence() {
        let v: Vec<Vec<u8>> = EnvValue::coerce("1,2", &none()).unwrap();
        assert_eq!(v, vec![vec![1], vec![2]]);
        assert_eq!(
            <Vec<Vec<u8>>>::shape(),
            Shape::Sequence(Box::new(Shape::Sequence(Box::new(Shape::Uint(8)))))
        );
    }

    #[test]
    fn test_duration_sequence() {
        let v: Vec<Duration> = EnvValue::coerce("1s, 2m", &none()).unwrap();
        assert_eq!(v, vec![Duration::from_secs(1), Duration::from_secs(120)]);
    }

    #[test]
    fn test_map_requires_encoding() {
        let result: Result<HashMap<String, u32>, _> = EnvValue::coerce(r#"{"a":1}"#, &none());
        assert!(matches!(result, Err(ValueError::NoDecoder { shape: Shape::Map })));

        let json = FormatOptions::Encoding(Encoding::Json);
        let map: BTreeMap<String, u32> = EnvValue::coerce(r#"{"a":1,"b":2}"#, &json).unwrap();
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_integer_shapes_carry_width() {
        assert_eq!(i8::shape(), Shape::Int(8));
        assert_eq!(u64::shape(), Shape::Uint(64));
        assert_eq!(<Option<f32>>::shape(), Shape::Pointer(Box::new(Shape::Float(32))));
    }
}
