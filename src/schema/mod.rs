//! Schema validator adapter
//!
//! Validation itself belongs to an external schema. This module only defines
//! the seam (`ValidationSchema`) and the adapter that turns the schema's
//! value/error pair into an [`EnvError`].

pub mod structured;

pub use structured::StructSchema;

use crate::error::{EnvError, Result};
use crate::preprocess::PreprocessedEnv;

/// An externally authored schema producing the validated shape `E`.
///
/// Implementations coerce, default and check the preprocessed map in one
/// synchronous call. Errors are plain messages; the adapter wraps them.
pub trait ValidationSchema<E>: Send + Sync {
    fn validate(&self, input: &PreprocessedEnv) -> std::result::Result<E, Vec<String>>;
}

impl<E, F> ValidationSchema<E> for F
where
    F: Fn(&PreprocessedEnv) -> std::result::Result<E, Vec<String>> + Send + Sync,
{
    fn validate(&self, input: &PreprocessedEnv) -> std::result::Result<E, Vec<String>> {
        self(input)
    }
}

/// Runs the backing schema once and reports failures as [`EnvError`].
pub struct SchemaValidator<E> {
    schema: Box<dyn ValidationSchema<E>>,
}

impl<E> SchemaValidator<E> {
    pub fn new(schema: impl ValidationSchema<E> + 'static) -> Self {
        Self::from_boxed(Box::new(schema))
    }

    pub fn from_boxed(schema: Box<dyn ValidationSchema<E>>) -> Self {
        Self { schema }
    }

    pub fn validate(&self, input: &PreprocessedEnv) -> Result<E> {
        self.schema.validate(input).map_err(EnvError::validation)
    }
}

impl<E> std::fmt::Debug for SchemaValidator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("shape", &std::any::type_name::<E>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn require_port(input: &PreprocessedEnv) -> std::result::Result<u16, Vec<String>> {
        match input.get("PORT") {
            Some(Value::String(s)) => s.parse().map_err(|_| vec![format!("PORT: not a port: {s}")]),
            _ => Err(vec!["PORT is required".to_string()]),
        }
    }

    #[test]
    fn test_success_passes_value_through() {
        let validator = SchemaValidator::new(require_port);
        let mut input = PreprocessedEnv::new();
        input.insert("PORT".into(), Value::String("8080".into()));

        assert_eq!(validator.validate(&input).unwrap(), 8080);
    }

    #[test]
    fn test_failure_keeps_messages() {
        let validator = SchemaValidator::new(require_port);
        let err = validator.validate(&PreprocessedEnv::new()).unwrap_err();

        assert!(matches!(err, EnvError::SchemaValidation { .. }));
        assert_eq!(err.messages(), ["PORT is required"]);
    }

    #[test]
    fn test_silent_failure_still_fails() {
        let validator =
            SchemaValidator::<()>::new(|_: &PreprocessedEnv| Err::<(), Vec<String>>(Vec::new()));
        let err = validator.validate(&PreprocessedEnv::new()).unwrap_err();
        assert_eq!(err.messages().len(), 1);
    }
}
