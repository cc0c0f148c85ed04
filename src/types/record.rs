//! Legacy catalog records as yielded by a record source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DATA_SET_ID_FIELD, IDENTIFIER_FIELD};

/// A single named field of a legacy record. Scalar source values are stored
/// as a one-element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    pub values: Vec<String>,
}

/// One archived-product description, in source field order.
///
/// The exporter reads a record once and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
    fields: Vec<RecordField>,
}

impl LegacyRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Repeated names are kept as separate fields, in order.
    #[must_use]
    pub fn with_field<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_field(name, values);
        self
    }

    pub fn push_field<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.push(RecordField {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
    }

    /// Build a record from a JSON object such as a Solr document.
    ///
    /// Arrays become multi-valued fields, scalars single-valued ones. Nulls
    /// are dropped and nested objects are kept as compact JSON text.
    #[must_use]
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .map(|(name, value)| {
                let values = match value {
                    Value::Array(items) => items.into_iter().filter_map(value_to_text).collect(),
                    other => value_to_text(other).into_iter().collect(),
                };
                RecordField { name, values }
            })
            .collect();
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Values of the first field named `name`.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.values.as_slice())
    }

    #[must_use]
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.values(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// The record's own stable identifier.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.first_value(IDENTIFIER_FIELD)
    }

    /// First `data_set_id` value, used to disambiguate every reference
    /// lookup on this record.
    #[must_use]
    pub fn disambiguator(&self) -> Option<&str> {
        self.first_value(DATA_SET_ID_FIELD)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_normalises_scalars_and_lists() {
        let Value::Object(object) = json!({
            "identifier": "urn:nasa:pds:ds1",
            "data_set_id": ["DS-1", "DS-2"],
            "start_time": 12,
            "archived": true,
            "empty": null,
            "target_name": ["MARS", null]
        }) else {
            panic!("object literal");
        };

        let record = LegacyRecord::from_json_object(object);
        let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["identifier", "data_set_id", "start_time", "archived", "empty", "target_name"]
        );
        assert_eq!(record.identifier(), Some("urn:nasa:pds:ds1"));
        assert_eq!(record.disambiguator(), Some("DS-1"));
        assert_eq!(record.values("start_time"), Some(&["12".to_string()][..]));
        assert_eq!(record.values("archived"), Some(&["true".to_string()][..]));
        assert_eq!(record.values("empty").map(<[String]>::len), Some(0));
        assert_eq!(record.values("target_name"), Some(&["MARS".to_string()][..]));
    }

    #[test]
    fn builder_keeps_field_order() {
        let record = LegacyRecord::new()
            .with_field("b", ["1"])
            .with_field("a", ["2", "3"]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.fields()[0].name, "b");
        assert_eq!(record.first_value("a"), Some("2"));
        assert!(record.disambiguator().is_none());
    }
}
