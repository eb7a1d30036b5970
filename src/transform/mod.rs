//! Field transform annotations
//!
//! Declares which environment variables are reshaped before validation and how.

pub mod options;
pub mod registry;

pub use options::{DEFAULT_SEPARATOR, FieldTransforms, TransformOptions};
pub use registry::TransformRegistry;
