use crate::model::Defaulted;
use serde_json::Value;

///
/// Tolerant reader over one raw resource.
///
/// Lookups use JSON pointers (`/valueQuantity/value`, `/name/0/given`).
/// A missing or wrongly-typed field yields the default and its name is recorded,
/// so a malformed resource degrades to empty fields instead of failing the load.
///
pub struct Record<'a> {
    value: &'a Value,
    defaulted: Defaulted,
}

impl<'a> Record<'a> {
    pub fn new(value: &'a Value) -> Self {
        Record {
            value,
            defaulted: Vec::new(),
        }
    }

    /// Text value, or empty when absent.
    /// Numbers are accepted as text, since identifiers are sometimes written unquoted.
    pub fn string(&mut self, field: &'static str, pointer: &str) -> String {
        self.optional_string(field, pointer).unwrap_or_default()
    }

    pub fn optional_string(&mut self, field: &'static str, pointer: &str) -> Option<String> {
        let text = match self.value.pointer(pointer) {
            Some(Value::String(s)) => Some(s.to_owned()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        if text.is_none() {
            self.defaulted.push(field);
        }
        text
    }

    pub fn number(&mut self, field: &'static str, pointer: &str) -> Option<f64> {
        let number = self
            .value
            .pointer(pointer)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite());

        if number.is_none() {
            self.defaulted.push(field);
        }
        number
    }

    /// Every string element of an array. Non-string elements are skipped.
    pub fn strings(&mut self, field: &'static str, pointer: &str) -> Vec<String> {
        match self.value.pointer(pointer) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => {
                self.defaulted.push(field);
                Vec::new()
            }
        }
    }

    /// Records a field whose raw value was present but not usable.
    pub fn mark_defaulted(&mut self, field: &'static str) {
        self.defaulted.push(field);
    }

    pub fn into_defaulted(self) -> Defaulted {
        self.defaulted
    }
}
