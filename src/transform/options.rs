//! Per-field transform annotations and the table that holds them.

use std::collections::BTreeMap;

/// Separator used when a split annotation does not name one
pub const DEFAULT_SEPARATOR: &str = ",";

/// How a single raw environment value is reshaped before validation.
///
/// Sanity of the options is not checked here: an empty separator or a
/// separator combined with `to_class` are stored exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Parse the raw string as JSON instead of splitting it
    pub to_class: bool,

    /// Split separator, ignored when `to_class` is set
    pub separator: Option<String>,
}

impl TransformOptions {
    /// Split on the default separator
    pub fn split() -> Self {
        Self::default()
    }

    /// Split on a custom separator
    pub fn split_on(separator: impl Into<String>) -> Self {
        Self {
            to_class: false,
            separator: Some(separator.into()),
        }
    }

    /// Parse the value as JSON into a nested shape (or a list of them)
    pub fn to_class() -> Self {
        Self {
            to_class: true,
            separator: None,
        }
    }

    /// Separator in effect for split transforms
    pub fn separator(&self) -> &str {
        self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }
}

/// Field name to transform table for one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTransforms {
    fields: BTreeMap<String, TransformOptions>,
}

impl FieldTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used by the `Environment` derive
    pub fn with(mut self, field: impl Into<String>, options: TransformOptions) -> Self {
        self.insert(field, options);
        self
    }

    /// Insert or replace the annotation of a field
    pub fn insert(&mut self, field: impl Into<String>, options: TransformOptions) {
        self.fields.insert(field.into(), options);
    }

    pub fn get(&self, field: &str) -> Option<&TransformOptions> {
        self.fields.get(field)
    }

    /// Add every entry of `other`, replacing annotations for the same field
    pub fn merge(&mut self, other: FieldTransforms) {
        self.fields.extend(other.fields);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransformOptions)> {
        self.fields.iter().map(|(name, opts)| (name.as_str(), opts))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separator() {
        assert_eq!(TransformOptions::split().separator(), ",");
        assert_eq!(TransformOptions::split_on(";").separator(), ";");
        assert!(!TransformOptions::split().to_class);
        assert!(TransformOptions::to_class().to_class);
    }

    #[test]
    fn test_options_are_not_sanitized() {
        let opts = TransformOptions::split_on("");
        assert_eq!(opts.separator(), "");

        let opts = TransformOptions {
            to_class: true,
            separator: Some("|".into()),
        };
        let table = FieldTransforms::new().with("WEIRD", opts.clone());
        assert_eq!(table.get("WEIRD"), Some(&opts));
    }

    #[test]
    fn test_merge_overrides_same_field() {
        let mut table = FieldTransforms::new()
            .with("HOSTS", TransformOptions::split())
            .with("DB", TransformOptions::to_class());
        table.merge(FieldTransforms::new().with("HOSTS", TransformOptions::split_on(";")));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("HOSTS").unwrap().separator(), ";");
        assert!(table.get("DB").unwrap().to_class);
    }
}
