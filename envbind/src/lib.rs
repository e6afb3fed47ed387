//! Populate configuration records from environment variables
//!
//! `envbind` fills a struct from a flat key-value source (the process
//! environment by default) using per-field tags that name the source key,
//! mark requirements, supply defaults and select conversion rules. Nested
//! records are recursed into with a composed key prefix.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::time::Duration;
//! use envbind::{Engine, Populate};
//!
//! #[derive(Debug, Default, Populate)]
//! struct Address {
//!     #[env("city")]
//!     city: String,
//! }
//!
//! #[derive(Debug, Default, Populate)]
//! struct Config {
//!     #[env("name")]
//!     name: String,
//!     #[env("timeout,required")]
//!     timeout: Duration,
//!     #[env("nums")]
//!     nums: Vec<i32>,
//!     #[env("nested:addr")]
//!     address: Address,
//! }
//!
//! # fn main() -> Result<(), envbind::Error> {
//! let source: HashMap<String, String> = [
//!     ("APP_NAME", "John"),
//!     ("APP_TIMEOUT", "10s"),
//!     ("APP_NUMS", "1,2,3"),
//!     ("APP_ADDR_CITY", "NYC"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let mut config = Config::default();
//! Engine::with_source(source).with_prefix("APP").populate(&mut config)?;
//!
//! assert_eq!(config.name, "John");
//! assert_eq!(config.timeout, Duration::from_secs(10));
//! assert_eq!(config.nums, vec![1, 2, 3]);
//! assert_eq!(config.address.city, "NYC");
//! # Ok(())
//! # }
//! ```
//!
//! # Tags
//!
//! ## `#[env("key[,required][,omitprefix]")]`
//!
//! The key is joined to the current prefix with `_` and upper-cased at lookup:
//! with prefix `APP`, `#[env("db_host")]` reads `APP_DB_HOST`.
//!
//! - `required`: fail when the variable is absent or empty and no default is set
//! - `omitprefix`: look the key up as-is, ignoring every prefix
//!
//! ## `#[env("nested:suffix")]` / `#[env("prefix:suffix")]`
//!
//! Recurse into a nested record, scoping its keys under `PREFIX_SUFFIX`.
//! An untagged field whose type implements [`Populate`] is recursed into
//! with the parent's prefix unchanged; other untagged fields are skipped.
//! `Option<T>` record fields are filled with `T::default()` before recursion.
//!
//! ## `default = "..."`
//!
//! Literal used as if it had been read when the variable is absent or empty.
//! A non-empty default satisfies `required`.
//!
//! ## `format = "..."`
//!
//! - `time:<layout>[,<location>]` for points in time (`chrono` layouts)
//! - `file:<ro|wo|rw>[|create][|truncate][|append][,<octal perms>]` for files
//! - `json` or `yaml` for maps and [`structured!`] records
//!
//! # Value Conversion
//!
//! | Type | Conversion |
//! |------|------------|
//! | `String`, `PathBuf` | verbatim |
//! | integers, floats | base 10, rejected when out of range for the width |
//! | `bool` | `1 t T TRUE true True 0 f F FALSE false False` |
//! | `Duration` | `300ms`, `1h30m`, `1.5s` |
//! | `Vec<T>` | split on `,`, each element converted as `T` |
//! | `Option<T>`, `Box<T>` | converted as `T`, assigned only when resolved |
//! | `HashMap`, `BTreeMap` | whole value through `json`/`yaml` |
//! | `DateTime`, `NaiveDateTime` | explicit layout or the fallback layouts |
//! | `chrono_tz::Tz` | time zone name |
//! | `url::Url`, `IpAddr`, [`HardwareAddr`] | whole value |
//! | `std::fs::File` | opened with the `file:` flags |
//! | [`parsable!`] types | through [`Parsable::parse_field`] |

extern crate self as envbind;

mod coerce;
pub mod decode;
mod engine;
mod error;
mod format;
#[doc(hidden)]
pub mod hook;
mod scalar;
mod shape;
mod source;
pub mod tag;
mod traverse;
mod value;

#[doc(hidden)]
#[path = "private.rs"]
pub mod __private;

pub use engine::Engine;
pub use envbind_derive::Populate;
pub use error::{Error, ValueError};
pub use format::{Access, Encoding, FileFormat, FormatOptions, TimeFormat};
pub use hook::Parsable;
pub use scalar::HardwareAddr;
pub use shape::Shape;
pub use source::{EnvSource, ProcessEnv, Snapshot};
pub use traverse::{FieldDescriptor, Populate, Scope};
pub use value::EnvValue;
