//! Transform registry keyed by shape type
//!
//! The registry is an ordinary value: the module bootstrap builds one while
//! the module is being registered and hands the table for its shape to the
//! preprocessor. Entries are never removed.

use super::options::{FieldTransforms, TransformOptions};
use crate::shape::EnvironmentShape;
use std::any::TypeId;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TransformRegistry {
    shapes: HashMap<TypeId, FieldTransforms>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the annotation of one field of shape `S`
    pub fn register<S: 'static>(&mut self, field: impl Into<String>, options: TransformOptions) {
        self.shapes
            .entry(TypeId::of::<S>())
            .or_default()
            .insert(field, options);
    }

    /// Record every annotation generated for shape `S`
    pub fn register_shape<S: EnvironmentShape>(&mut self) {
        self.shapes
            .entry(TypeId::of::<S>())
            .or_default()
            .merge(S::field_transforms());
    }

    /// Annotations registered for shape `S`, empty if there are none
    pub fn transforms_for<S: 'static>(&self) -> FieldTransforms {
        self.shapes
            .get(&TypeId::of::<S>())
            .cloned()
            .unwrap_or_default()
    }
}
