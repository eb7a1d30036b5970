//! Struct-backed schema
//!
//! The stock [`ValidationSchema`] for shapes that derive `Deserialize` and
//! `Validate`. Type coercion and defaults come from deserializing through a
//! `config::Value` tree (so `"8080"` becomes a number and `"true"` a bool),
//! constraints come from `validator`.

use super::ValidationSchema;
use crate::preprocess::PreprocessedEnv;
use config::{Map, Value as ConfigValue, ValueKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

pub struct StructSchema<E> {
    _shape: PhantomData<fn() -> E>,
}

impl<E> StructSchema<E> {
    pub fn new() -> Self {
        Self {
            _shape: PhantomData,
        }
    }
}

impl<E> Default for StructSchema<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ValidationSchema<E> for StructSchema<E>
where
    E: DeserializeOwned + Validate,
{
    fn validate(&self, input: &PreprocessedEnv) -> Result<E, Vec<String>> {
        let tree = table_value(input);
        let env: E = tree.try_deserialize().map_err(|e| vec![e.to_string()])?;

        env.validate().map_err(|errors| {
            let mut messages = Vec::new();
            flatten_errors(&errors, "", &mut messages);
            messages.sort();
            messages
        })?;

        Ok(env)
    }
}

fn table_value(map: &PreprocessedEnv) -> ConfigValue {
    let table: Map<String, ConfigValue> = map
        .iter()
        .map(|(key, value)| (key.clone(), config_value(value)))
        .collect();
    ConfigValue::new(None, ValueKind::Table(table))
}

fn config_value(value: &Value) -> ConfigValue {
    let kind = match value {
        Value::Null => ValueKind::Nil,
        Value::Bool(b) => ValueKind::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueKind::I64(i)
            } else if let Some(u) = n.as_u64() {
                ValueKind::U64(u)
            } else {
                ValueKind::Float(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => ValueKind::String(s.clone()),
        Value::Array(items) => ValueKind::Array(items.iter().map(config_value).collect()),
        Value::Object(map) => return table_value(map),
    };
    ConfigValue::new(None, kind)
}

fn flatten_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    out.push(format!("{}: {}", path, describe(failure)));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn describe(failure: &ValidationError) -> String {
    match &failure.message {
        Some(message) => message.to_string(),
        None => format!("failed '{}' check", failure.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    struct Server {
        #[validate(range(min = 1))]
        port: u16,
        #[serde(default)]
        debug: bool,
        #[serde(default = "default_name")]
        name: String,
    }

    fn default_name() -> String {
        "api".to_string()
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Upstream {
        #[validate(length(min = 1, message = "must not be empty"))]
        host: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    struct WithUpstreams {
        #[validate(nested)]
        upstreams: Vec<Upstream>,
    }

    fn input(value: serde_json::Value) -> PreprocessedEnv {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_coerces_strings_and_applies_defaults() {
        let schema = StructSchema::<Server>::new();
        let server = schema
            .validate(&input(json!({"PORT": "8080", "DEBUG": "true"})))
            .unwrap();

        assert_eq!(server.port, 8080);
        assert!(server.debug);
        assert_eq!(server.name, "api");
    }

    #[test]
    fn test_missing_field_is_named() {
        let schema = StructSchema::<Server>::new();
        let messages = schema.validate(&input(json!({"DEBUG": "false"}))).unwrap_err();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("PORT"), "{:?}", messages);
    }

    #[test]
    fn test_bad_type_is_rejected() {
        let schema = StructSchema::<Server>::new();
        assert!(schema.validate(&input(json!({"PORT": "eighty"}))).is_err());
    }

    #[test]
    fn test_range_constraint() {
        let schema = StructSchema::<Server>::new();
        let messages = schema.validate(&input(json!({"PORT": "0"}))).unwrap_err();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("range"), "{:?}", messages);
    }

    #[test]
    fn test_nested_list_errors_carry_index() {
        let schema = StructSchema::<WithUpstreams>::new();
        let messages = schema
            .validate(&input(json!({"UPSTREAMS": [{"host": "a"}, {"host": ""}]})))
            .unwrap_err();

        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("[1].host"), "{:?}", messages);
        assert!(messages[0].ends_with("must not be empty"));
    }

    #[test]
    fn test_config_value_conversion() {
        let value = config_value(&json!({"a": [1, -2, 1.5, null, true, "x"]}));
        let table = value.into_table().unwrap();
        let items = table["a"].clone().into_array().unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[1].clone().into_int().unwrap(), -2);
        assert!(items[4].clone().into_bool().unwrap());
        assert_eq!(items[5].clone().into_string().unwrap(), "x");
    }
}
