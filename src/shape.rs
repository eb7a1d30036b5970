//! Shape declarations and typed lookup keys

use crate::transform::FieldTransforms;
use serde::de::DeserializeOwned;
use std::fmt;

/// A struct describing the expected environment.
///
/// Usually implemented with `#[derive(Environment)]`, which fills in the
/// field list and the transform table from `#[env(...)]` attributes.
pub trait EnvironmentShape: DeserializeOwned + Send + Sync + 'static {
    /// Environment variable names of every declared field
    fn field_names() -> &'static [&'static str] {
        &[]
    }

    /// Per-field transform annotations
    fn field_transforms() -> FieldTransforms {
        FieldTransforms::default()
    }
}

/// Typed key of one field of shape `E`.
///
/// Keys are the only way to read through [`crate::EnvironmentService::get`],
/// so a lookup can only name a declared field and always yields its type.
pub struct EnvKey<E, V: ?Sized> {
    name: &'static str,
    access: fn(&E) -> &V,
}

impl<E, V: ?Sized> EnvKey<E, V> {
    pub const fn new(name: &'static str, access: fn(&E) -> &V) -> Self {
        Self { name, access }
    }

    /// Environment variable name
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn read<'a>(&self, env: &'a E) -> &'a V {
        (self.access)(env)
    }
}

impl<E, V: ?Sized> Clone for EnvKey<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V: ?Sized> Copy for EnvKey<E, V> {}

impl<E, V: ?Sized> fmt::Debug for EnvKey<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnvKey").field(&self.name).finish()
    }
}
