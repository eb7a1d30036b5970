//! Environment preprocessor
//!
//! Turns the raw string-to-string environment into a JSON map in which
//! annotated fields already carry their structured form. Unannotated values
//! stay strings; coercing them is left to the schema.

use crate::error::{EnvError, Result};
use crate::transform::{FieldTransforms, TransformOptions};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Environment as read from the process
pub type RawEnvironment = BTreeMap<String, String>;

/// Environment after transforms, ready for the schema
pub type PreprocessedEnv = Map<String, Value>;

/// Snapshot the process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn read_process_env() -> RawEnvironment {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct EnvironmentPreprocessor {
    transforms: FieldTransforms,
}

impl EnvironmentPreprocessor {
    pub fn new(transforms: FieldTransforms) -> Self {
        Self { transforms }
    }

    pub fn transforms(&self) -> &FieldTransforms {
        &self.transforms
    }

    /// Apply the transform table to a raw environment.
    ///
    /// Annotated fields missing from `raw` stay unset so schema defaults apply.
    pub fn preprocess(&self, raw: &RawEnvironment) -> Result<PreprocessedEnv> {
        let mut out: PreprocessedEnv = raw
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        for (field, options) in self.transforms.iter() {
            let Some(value) = raw.get(field) else {
                continue;
            };
            out.insert(field.to_string(), transform_value(field, value, options)?);
        }

        Ok(out)
    }
}

fn transform_value(field: &str, value: &str, options: &TransformOptions) -> Result<Value> {
    if options.to_class {
        // One level of JSON only. Annotations on the nested shape are not applied.
        let parsed: Value =
            serde_json::from_str(value).map_err(|source| EnvError::MalformedTransformInput {
                field: field.to_string(),
                source,
            })?;
        debug!(
            field,
            candidates = parsed.as_array().map_or(1, Vec::len),
            "Parsed structured environment value"
        );
        return Ok(parsed);
    }

    let separator = options.separator();
    let items: Vec<Value> = value
        .split(separator)
        .map(|item| Value::String(item.to_string()))
        .collect();
    debug!(field, separator, items = items.len(), "Split environment value");
    Ok(Value::Array(items))
}
