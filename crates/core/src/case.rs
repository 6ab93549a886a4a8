//! Generated case records.
//!
//! A case arrives from the generator as a free-form JSON tree. Only a handful of fields are
//! interpreted by MedPlat; every read here is nullable so that a malformed case reads as
//! "field absent" rather than failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One AI-generated clinical teaching case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseRecord(Value);

impl CaseRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// `meta.lmic_mode`, true only when it is the JSON boolean `true`.
    pub fn lmic_mode(&self) -> bool {
        self.0
            .pointer("/meta/lmic_mode")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Sets `meta.lmic_mode`, creating `meta` if the case has none.
    ///
    /// Does nothing if the case root or `meta` is not an object.
    pub fn set_lmic_mode(&mut self, enabled: bool) {
        let Some(root) = self.0.as_object_mut() else {
            return;
        };
        let meta = root
            .entry("meta")
            .or_insert_with(|| Value::Object(Default::default()));
        if let Some(meta) = meta.as_object_mut() {
            meta.insert("lmic_mode".to_string(), Value::Bool(enabled));
        }
    }

    pub fn has_lmic_mode(&self) -> bool {
        self.0.pointer("/meta/lmic_mode").is_some()
    }

    /// Free text used to recognise what the case is about: the diagnosis fields, the
    /// history and the physical exam, each flattened to a string.
    pub fn clinical_texts(&self) -> Vec<String> {
        const TEXT_POINTERS: &[&str] = &[
            "/meta/diagnosis",
            "/meta/topic",
            "/final_diagnosis",
            "/diagnosis",
            "/history",
            "/physical_exam",
        ];

        TEXT_POINTERS
            .iter()
            .filter_map(|pointer| self.0.pointer(pointer))
            .filter_map(value_text)
            .collect()
    }
}

impl From<Value> for CaseRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Flattens a JSON value into searchable text.
///
/// Strings are returned as-is; objects and arrays are serialised. `null` has no text.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
