//! Redaction of sensitive fields inside JSON documents.
//!
//! Masking is best-effort: text that does not parse as JSON is handed back
//! untouched, so a log line is never lost because of the masker.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Sentinel written in place of a sensitive value.
pub const MASKED_VALUE: &str = "***MASKED***";

/// Replaces the values of configured object members with [`MASKED_VALUE`].
///
/// Member names are compared case-insensitively. Only object members are
/// ever masked; array elements and scalars are walked or copied as they are.
#[derive(Debug, Clone, Default)]
pub struct SensitiveDataMasker {
    fields: HashSet<String>,
}

impl SensitiveDataMasker {
    /// Creates a masker for the given field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|field| field.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true when `name` is one of the configured fields.
    #[must_use]
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.fields.contains(&name.to_lowercase())
    }

    /// Returns true when no field is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Masks `text` if it is a JSON document, otherwise returns it unchanged.
    ///
    /// The result is compact JSON. Member order and the literal text of
    /// numbers are kept; whitespace is not.
    #[must_use]
    pub fn mask(&self, text: &str) -> String {
        let Ok(document) = serde_json::from_str::<Value>(text) else {
            return text.to_string();
        };

        match serde_json::to_string(&self.mask_value(document)) {
            Ok(masked) => masked,
            Err(_) => text.to_string(),
        }
    }

    /// Masks an already parsed document.
    #[must_use]
    pub fn mask_value(&self, value: Value) -> Value {
        match value {
            Value::Object(members) => Value::Object(self.mask_object(members)),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.mask_value(item)).collect())
            }
            scalar => scalar,
        }
    }

    fn mask_object(&self, members: Map<String, Value>) -> Map<String, Value> {
        members
            .into_iter()
            .map(|(name, value)| {
                let value = if self.is_sensitive(&name) {
                    Value::String(MASKED_VALUE.to_string())
                } else {
                    self.mask_value(value)
                };
                (name, value)
            })
            .collect()
    }
}

/// Masks `text` against `fields` without keeping a masker around.
#[must_use]
pub fn mask<S: AsRef<str>>(text: &str, fields: &[S]) -> String {
    SensitiveDataMasker::new(fields).mask(text)
}
