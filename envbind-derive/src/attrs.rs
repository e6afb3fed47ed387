//! Attribute parsing for `#[env(...)]` annotations.
//!
//! Field attributes take the tag as a leading string literal followed by
//! optional `key = "value"` pairs:
//!
//! ```text
//! #[env("port,required", default = "8080", format = "json")]
//! ```
//!
//! The container attribute takes `prefix = "..."`.

use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Field, Ident, LitStr, Token};

const NESTING_MARKERS: [&str; 2] = ["nested:", "prefix:"];

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Raw tag string, `None` when the field carries no tag.
    pub tag: Option<String>,

    /// Default-value tag.
    pub default: Option<String>,

    /// Format-option string.
    pub format: Option<String>,
}

/// How the derive wires a field into the generated walk.
#[derive(Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Untagged: recursed into when the type implements `Populate`,
    /// skipped otherwise.
    Probe,
    /// Tagged with a nesting directive.
    Nested,
    /// Tagged with a key.
    Leaf,
}

impl FieldAttrs {
    /// Extract and merge every `#[env(...)]` attribute on a field.
    ///
    /// Attributes of other macros are ignored.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("env")) {
            let parsed: FieldAttrs = attr.parse_args()?;
            merge(&mut attrs.tag, parsed.tag, attr, "tag")?;
            merge(&mut attrs.default, parsed.default, attr, "default")?;
            merge(&mut attrs.format, parsed.format, attr, "format")?;
        }
        Ok(attrs)
    }

    pub fn kind(&self) -> FieldKind {
        let tag = self.tag.as_deref().unwrap_or_default().trim();
        if tag.is_empty() {
            FieldKind::Probe
        } else if NESTING_MARKERS.iter().any(|marker| tag.starts_with(marker)) {
            FieldKind::Nested
        } else {
            FieldKind::Leaf
        }
    }

    /// Reject options that only make sense on leaf fields.
    pub fn validate(&self, field: &Field) -> syn::Result<()> {
        let kind = self.kind();
        if kind == FieldKind::Leaf {
            return Ok(());
        }
        let what = match kind {
            FieldKind::Nested => "nested record fields",
            _ => "untagged fields",
        };
        if self.default.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                format!("`default` is not supported on {what}"),
            ));
        }
        if self.format.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                format!("`format` is not supported on {what}"),
            ));
        }
        Ok(())
    }
}

fn merge(
    slot: &mut Option<String>,
    value: Option<String>,
    attr: &Attribute,
    name: &str,
) -> syn::Result<()> {
    if let Some(value) = value {
        if slot.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                format!("duplicate env `{name}`"),
            ));
        }
        *slot = Some(value);
    }
    Ok(())
}

impl Parse for FieldAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = Self::default();

        // Leading tag literal
        if input.peek(LitStr) {
            attrs.tag = Some(input.parse::<LitStr>()?.value());
            if input.is_empty() {
                return Ok(attrs);
            }
            input.parse::<Token![,]>()?;
        }

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;

            let slot = match key.to_string().as_str() {
                "default" => &mut attrs.default,
                "format" => &mut attrs.format,
                _ => return Err(syn::Error::new(key.span(), "unsupported env attribute")),
            };
            if slot.is_some() {
                return Err(syn::Error::new(key.span(), format!("duplicate env `{key}`")));
            }
            *slot = Some(value.value());

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(attrs)
    }
}

/// Parsed container-level `#[env(...)]` attributes.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// Base prefix used by `Populate::from_env`.
    pub prefix: String,
}

impl StructAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("env")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("prefix") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.prefix = value.value();
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level env attribute"))
            })?;
        }

        Ok(result)
    }
}
