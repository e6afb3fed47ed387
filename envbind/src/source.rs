//! Key-value sources the traversal reads from.

use std::collections::{BTreeMap, HashMap};
use std::env;

/// Read-only key lookup.
///
/// Keys are passed already upper-cased. Returns `None` when the key is not
/// present; a present key with an empty value returns `Some("")`.
pub trait EnvSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The live process environment.
///
/// Variables whose value is not valid Unicode are treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Point-in-time copy of the process environment.
///
/// Later changes to the environment are not observed.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    vars: HashMap<String, String>,
}

impl Snapshot {
    /// Capture the current process environment, skipping entries that are
    /// not valid Unicode.
    pub fn capture() -> Self {
        Self {
            vars: env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        }
    }
}

impl EnvSource for Snapshot {
    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl<S: std::hash::BuildHasher> EnvSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}
