//! Support for macro-generated code.
//!
//! An untagged field is recursed into when its type implements [`Populate`]
//! and skipped otherwise. The derive cannot see trait impls, so it emits
//!
//! ```ignore
//! (&&Probe::<FieldType>::new()).visit(&mut self.field, scope, &desc)
//! ```
//!
//! and method resolution picks [`ViaPopulate`] (matched on `&&Probe<T>`)
//! before falling back to [`ViaSkip`] (matched on `&Probe<T>`).

use std::marker::PhantomData;

use tracing::trace;

use crate::error::Error;
use crate::traverse::{FieldDescriptor, Populate, Scope};

pub struct Probe<T>(PhantomData<fn() -> T>);

impl<T> Probe<T> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

pub trait ViaPopulate<T> {
    fn visit(&self, field: &mut T, scope: &Scope<'_>, desc: &FieldDescriptor) -> Result<(), Error>;
}

impl<T: Populate> ViaPopulate<T> for &Probe<T> {
    fn visit(&self, field: &mut T, scope: &Scope<'_>, desc: &FieldDescriptor) -> Result<(), Error> {
        scope.nested(field, desc)
    }
}

pub trait ViaSkip<T> {
    fn visit(&self, field: &mut T, scope: &Scope<'_>, desc: &FieldDescriptor) -> Result<(), Error>;
}

impl<T> ViaSkip<T> for Probe<T> {
    fn visit(&self, _field: &mut T, _scope: &Scope<'_>, desc: &FieldDescriptor) -> Result<(), Error> {
        trace!(field = desc.name, "skipping untagged field");
        Ok(())
    }
}
