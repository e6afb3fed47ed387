//! Depth-first walk over a record's fields.
//!
//! Each field is classified by its tag:
//!
//! - a leaf is resolved from one key: the key is composed with the current
//!   prefix (unless `omitprefix`), looked up, defaulted or rejected when
//!   missing, coerced through its [`EnvValue`] impl, then assigned;
//! - a structural field is recursed into with the prefix extended by its
//!   `nested:` suffix, or unchanged when the field is untagged.
//!
//! The walk is fail-fast. Fields assigned before a failure keep their values.

use tracing::{debug, trace};

use crate::error::Error;
use crate::format::FormatOptions;
use crate::shape::Shape;
use crate::source::EnvSource;
use crate::tag::{Recurse, TagDirective};
use crate::value::EnvValue;

/// A record whose fields can be populated from environment values.
///
/// Usually derived with `#[derive(Populate)]`, which walks fields in
/// declaration order.
pub trait Populate {
    /// Base prefix declared on the type with `#[env(prefix = "...")]`.
    const PREFIX: &'static str = "";

    /// Populate every field from `scope`.
    fn populate(&mut self, scope: &Scope<'_>) -> Result<(), Error>;

    /// Reject targets the entry operation cannot populate.
    fn check_target(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Build a default instance and populate it from the process environment
    /// using [`Self::PREFIX`].
    ///
    /// There is no panicking variant. At startup, where a bad environment
    /// should abort, call `.expect(..)` on the result:
    ///
    /// ```rust
    /// use envbind::Populate;
    ///
    /// #[derive(Debug, Default, Populate)]
    /// #[env(prefix = "DOC_FROM_ENV")]
    /// struct Config {
    ///     #[env("workers", default = "4")]
    ///     workers: usize,
    /// }
    ///
    /// let config = Config::from_env().expect("invalid environment");
    /// assert_eq!(config.workers, 4);
    /// ```
    fn from_env() -> Result<Self, Error>
    where
        Self: Sized + Default,
    {
        let mut target = Self::default();
        crate::Engine::new()
            .with_prefix(Self::PREFIX)
            .populate(&mut target)?;
        Ok(target)
    }
}

/// Pointer slot for a nested record: filled with `T::default()` before
/// recursion, even if no key below it is present.
impl<T: Populate + Default> Populate for Option<T> {
    const PREFIX: &'static str = T::PREFIX;

    fn populate(&mut self, scope: &Scope<'_>) -> Result<(), Error> {
        if self.is_none() {
            trace!(prefix = scope.prefix(), "allocating nested record");
        }
        self.get_or_insert_with(T::default).populate(scope)
    }

    fn check_target(&self) -> Result<(), Error> {
        match self {
            Some(inner) => inner.check_target(),
            None => Err(Error::InvalidTarget {
                reason: format!("empty Option<{}>", std::any::type_name::<T>()),
            }),
        }
    }
}

impl<T: Populate> Populate for Box<T> {
    const PREFIX: &'static str = T::PREFIX;

    fn populate(&mut self, scope: &Scope<'_>) -> Result<(), Error> {
        (**self).populate(scope)
    }

    fn check_target(&self) -> Result<(), Error> {
        (**self).check_target()
    }
}

/// Static description of one field, emitted by the derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name.
    pub name: &'static str,
    /// Raw tag: `<key>[,required][,omitprefix]`, `nested:<suffix>` or empty.
    pub tag: &'static str,
    /// Raw format option.
    pub format: &'static str,
    /// Default-value tag.
    pub default: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            tag,
            format: "",
            default: None,
        }
    }

    pub const fn with_format(mut self, format: &'static str) -> Self {
        self.format = format;
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

enum Lookup<'d> {
    Value(String),
    Default(&'d str),
    Absent,
}

/// Traversal state for one nesting level: the source and the accumulated
/// prefix.
#[derive(Clone)]
pub struct Scope<'a> {
    source: &'a dyn EnvSource,
    prefix: String,
}

impl<'a> Scope<'a> {
    pub fn new(source: &'a dyn EnvSource, prefix: impl Into<String>) -> Self {
        Self {
            source,
            prefix: prefix.into(),
        }
    }

    /// Accumulated prefix, in declared case.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Scope for a nested record: `prefix + "_" + suffix`.
    pub fn child(&self, suffix: &str) -> Scope<'a> {
        let prefix = match (self.prefix.is_empty(), suffix.is_empty()) {
            (_, true) => self.prefix.clone(),
            (true, false) => suffix.to_string(),
            (false, false) => format!("{}_{}", self.prefix, suffix),
        };
        Scope {
            source: self.source,
            prefix,
        }
    }

    /// Upper-cased lookup key for a leaf directive.
    pub fn resolve_key(&self, directive: &TagDirective<'_>) -> String {
        if directive.omit_prefix || self.prefix.is_empty() {
            directive.key.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, directive.key).to_uppercase()
        }
    }

    /// Resolve, coerce and assign a leaf field.
    ///
    /// A field whose key is absent, not required and without default is left
    /// untouched.
    pub fn leaf<T: EnvValue>(&self, field: &mut T, desc: &FieldDescriptor) -> Result<(), Error> {
        let directive = TagDirective::parse(desc.tag, desc.default);
        match directive.recurse {
            Recurse::None => {}
            Recurse::Nested(suffix) => {
                return Err(Error::UnsupportedShape {
                    key: self.child(suffix).prefix.to_uppercase(),
                    shape: T::shape(),
                });
            }
            Recurse::Transparent => {
                trace!(field = desc.name, "skipping untagged field");
                return Ok(());
            }
        }

        let key = self.resolve_key(&directive);
        let (raw, from_default) = match self.lookup(&key, &directive)? {
            Lookup::Value(value) => (value, false),
            Lookup::Default(default) => (default.to_string(), true),
            Lookup::Absent => {
                trace!(field = desc.name, key = %key, "not set, leaving field untouched");
                return Ok(());
            }
        };

        let shape = T::shape();
        let format = FormatOptions::parse(desc.format, &shape);
        *field = T::coerce(&raw, &format)
            .map_err(|source| Error::from_value(key.clone(), desc.format, source))?;

        debug!(field = desc.name, key = %key, shape = %shape, from_default, "assigned field");
        Ok(())
    }

    /// Recurse into a structural field.
    pub fn nested<T: Populate>(&self, field: &mut T, desc: &FieldDescriptor) -> Result<(), Error> {
        let directive = TagDirective::parse(desc.tag, None);
        let scope = match directive.recurse {
            Recurse::Nested(suffix) => self.child(suffix),
            Recurse::Transparent => self.clone(),
            Recurse::None => {
                return Err(Error::UnsupportedShape {
                    key: self.resolve_key(&directive),
                    shape: Shape::Struct,
                });
            }
        };

        trace!(field = desc.name, prefix = scope.prefix(), "entering nested record");
        field.populate(&scope)
    }

    fn lookup<'d>(&self, key: &str, directive: &TagDirective<'d>) -> Result<Lookup<'d>, Error> {
        let default = directive.non_empty_default();
        match (self.source.lookup(key), default) {
            (Some(value), _) if !value.is_empty() => Ok(Lookup::Value(value)),
            (_, Some(default)) => Ok(Lookup::Default(default)),
            (None, None) if directive.required => Err(Error::MissingRequired {
                key: key.to_string(),
            }),
            (Some(_), None) if directive.required => Err(Error::EmptyRequired {
                key: key.to_string(),
            }),
            (Some(empty), None) => Ok(Lookup::Value(empty)),
            (None, None) => Ok(Lookup::Absent),
        }
    }
}
