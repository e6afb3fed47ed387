//! Field tag grammar.
//!
//! ```text
//! <key>[,required][,omitprefix]
//! nested:<suffix>
//! prefix:<suffix>
//! ```
//!
//! Flags after the key are matched literally, in any order; unknown flags are
//! ignored.

const REQUIRED: &str = "required";
const OMIT_PREFIX: &str = "omitprefix";
const NESTING_MARKERS: [&str; 2] = ["nested:", "prefix:"];

/// How a field takes part in the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurse<'a> {
    /// Leaf field resolved from a single key.
    None,
    /// Nested record whose keys are scoped under an extra prefix fragment.
    Nested(&'a str),
    /// Untagged nested record that shares its parent's prefix.
    Transparent,
}

/// Directives parsed from a field's tag and default-value tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective<'a> {
    /// Source key, taken verbatim (case is normalized only at lookup).
    pub key: &'a str,
    pub required: bool,
    /// Skip the base and nesting prefixes when resolving the key.
    pub omit_prefix: bool,
    /// Literal fallback used when the key is absent or empty.
    pub default: Option<&'a str>,
    pub recurse: Recurse<'a>,
}

impl<'a> TagDirective<'a> {
    /// Parse a raw tag together with the field's default-value tag.
    pub fn parse(tag: &'a str, default: Option<&'a str>) -> Self {
        let tag = tag.trim();
        if tag.is_empty() {
            return Self::structural(Recurse::Transparent);
        }

        if let Some(suffix) = nesting_suffix(tag) {
            return Self::structural(Recurse::Nested(suffix));
        }

        let mut parts = tag.split(',').map(str::trim);
        let key = parts.next().unwrap_or_default();
        let mut directive = Self {
            key,
            required: false,
            omit_prefix: false,
            default,
            recurse: Recurse::None,
        };
        for flag in parts {
            match flag {
                REQUIRED => directive.required = true,
                OMIT_PREFIX => directive.omit_prefix = true,
                _ => {}
            }
        }
        directive
    }

    /// Whether the field is a nested record rather than a leaf.
    pub fn is_structural(&self) -> bool {
        self.recurse != Recurse::None
    }

    /// Default value, if one is set and non-empty.
    pub fn non_empty_default(&self) -> Option<&'a str> {
        self.default.filter(|value| !value.is_empty())
    }

    fn structural(recurse: Recurse<'a>) -> Self {
        Self {
            key: "",
            required: false,
            omit_prefix: false,
            default: None,
            recurse,
        }
    }
}

/// Suffix of a `nested:`/`prefix:` tag, if the tag is a nesting directive.
pub fn nesting_suffix(tag: &str) -> Option<&str> {
    let tag = tag.trim();
    NESTING_MARKERS
        .iter()
        .find_map(|marker| tag.strip_prefix(marker))
        .map(str::trim)
}
