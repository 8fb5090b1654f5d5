//! Hits to typed documents.

use crate::document::SearchDocument;
use crate::result::Hit;
use serde_json::Value;
use std::collections::HashMap;

/// Wire form of one hit's data: field name to its string values.
pub type WireFields = HashMap<String, Vec<String>>;

/// Build a `D` from one hit.
///
/// Fields missing from `data` keep their default. Values that do not parse
/// degrade the way [`FieldType`](crate::document::FieldType) describes.
pub fn map_hit<D: SearchDocument>(id: &str, data: &WireFields) -> D {
    let mut document = D::default();
    document.set_id(id.to_string());

    for field in D::fields() {
        if let Some(values) = data.get(field.name) {
            (field.set)(&mut document, values);
        }
    }

    document
}

/// Flatten a JSON field value into the string list the mapper expects.
///
/// The service sends arrays of strings, but numbers and bare scalars are
/// accepted too. Nulls and nested structures are dropped.
pub fn wire_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert a hit's `data` object to [`WireFields`].
pub fn wire_fields(data: &Value) -> WireFields {
    match data.as_object() {
        Some(object) => object
            .iter()
            .map(|(name, value)| (name.clone(), wire_values(value)))
            .collect(),
        None => WireFields::new(),
    }
}

/// Map the `hits.hit` array of a response.
///
/// A hit without an `id` is kept with an empty id; a hit whose `data` is
/// missing maps to a default document.
pub fn read_hits<D: SearchDocument>(hits: Option<&Value>) -> Vec<Hit<D>> {
    let Some(hits) = hits else {
        return Vec::new();
    };
    let Some(items) = hits.as_array() else {
        tracing::warn!("hits.hit is not an array; ignoring hits");
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let id = match item.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => {
                    tracing::warn!("hit without an id");
                    String::new()
                }
            };
            let data = item.get("data").map(wire_fields).unwrap_or_default();
            Hit {
                data: map_hit::<D>(&id, &data),
                id,
            }
        })
        .collect()
}
