//! Public entry point.

use tracing::debug;

use crate::error::Error;
use crate::source::{EnvSource, ProcessEnv};
use crate::traverse::{Populate, Scope};

/// Populates records from an [`EnvSource`] under a base prefix.
///
/// The prefix is configuration set before a traversal and only read during
/// one, so an engine can be reused for any number of traversals.
///
/// ```rust
/// use std::collections::HashMap;
/// use envbind::{Engine, Populate};
///
/// #[derive(Debug, Default, Populate)]
/// struct Config {
///     #[env("name")]
///     name: String,
///     #[env("port", default = "8080")]
///     port: u16,
/// }
///
/// # fn main() -> Result<(), envbind::Error> {
/// let source = HashMap::from([("APP_NAME".to_string(), "John".to_string())]);
/// let engine = Engine::with_source(source).with_prefix("APP");
///
/// let mut config = Config::default();
/// engine.populate(&mut config)?;
/// assert_eq!(config.name, "John");
/// assert_eq!(config.port, 8080);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine<S = ProcessEnv> {
    source: S,
    prefix: String,
}

impl Engine<ProcessEnv> {
    /// Engine over the live process environment with no prefix.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EnvSource> Engine<S> {
    /// Engine over an arbitrary source with no prefix.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            prefix: String::new(),
        }
    }

    /// Set the base prefix joined with `_` in front of every key.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Populate `target` using the engine's prefix.
    ///
    /// # Errors
    ///
    /// - `target` is an empty `Option` slot
    /// - a required variable is missing or empty
    /// - a value cannot be converted into its field's type
    pub fn populate<T: Populate>(&self, target: &mut T) -> Result<(), Error> {
        self.populate_with_prefix(target, &self.prefix)
    }

    /// Populate `target` using `prefix` instead of the engine's prefix.
    pub fn populate_with_prefix<T: Populate>(&self, target: &mut T, prefix: &str) -> Result<(), Error> {
        target.check_target()?;
        debug!(
            record = std::any::type_name::<T>(),
            prefix, "populating record from environment"
        );
        target.populate(&Scope::new(&self.source, prefix))
    }
}
