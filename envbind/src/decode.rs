//! Structured decoders for maps and records.

use serde::de::DeserializeOwned;

use crate::error::ValueError;
use crate::format::{Encoding, FormatOptions};
use crate::shape::Shape;

/// Decode the whole raw value with the decoder selected by `format`.
///
/// Fails closed with [`ValueError::NoDecoder`] when no decoder is selected.
pub fn structured<T: DeserializeOwned>(
    raw: &str,
    format: &FormatOptions<'_>,
    shape: Shape,
) -> Result<T, ValueError> {
    match format.encoding() {
        Some(Encoding::Json) => {
            serde_json::from_str(raw).map_err(|source| ValueError::Json { shape, source })
        }
        Some(Encoding::Yaml) => {
            serde_yaml::from_str(raw).map_err(|source| ValueError::Yaml { shape, source })
        }
        None => Err(ValueError::NoDecoder { shape }),
    }
}
