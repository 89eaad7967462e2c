//! JSON <-> Firestore REST value mapping.
//!
//! The Firestore REST API wraps every field in a typed value object
//! (`{"stringValue": ...}`, `{"integerValue": "42"}`, ...). These functions
//! translate between plain `serde_json::Value` documents and the
//! `{"fields": {...}}` envelope the API speaks. Integer values arrive as
//! strings on the wire; timestamps are carried as RFC 3339 strings.

use serde_json::{json, Map, Value};

/// Wraps a plain JSON object into a Firestore document body.
pub fn to_firestore_document(doc: &Value) -> Value {
    let fields: Map<String, Value> = doc
        .as_object()
        .map(|o| {
            o.iter()
                .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                .collect()
        })
        .unwrap_or_default();
    json!({ "fields": fields })
}

/// Unwraps a Firestore document body into a plain JSON object.
pub fn from_firestore_document(doc: &Value) -> Value {
    let fields: Map<String, Value> = doc
        .get("fields")
        .and_then(Value::as_object)
        .map(|o| {
            o.iter()
                .map(|(k, v)| (k.clone(), from_firestore_value(v)))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(fields)
}

fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({"integerValue": i.to_string()})
            } else {
                json!({"doubleValue": n.as_f64()})
            }
        }
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => json!({
            "arrayValue": {"values": items.iter().map(to_firestore_value).collect::<Vec<_>>()}
        }),
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                .collect();
            json!({"mapValue": {"fields": fields}})
        }
    }
}

fn from_firestore_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };

    if obj.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(b) = obj.get("booleanValue") {
        return b.clone();
    }
    if let Some(i) = obj.get("integerValue") {
        // Integers come back as strings.
        if let Some(parsed) = i.as_str().and_then(|s| s.parse::<i64>().ok()) {
            return json!(parsed);
        }
        return i.clone();
    }
    if let Some(d) = obj.get("doubleValue") {
        return d.clone();
    }
    if let Some(s) = obj.get("stringValue").or_else(|| obj.get("timestampValue")) {
        return s.clone();
    }
    if let Some(arr) = obj.get("arrayValue") {
        let items = arr
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(from_firestore_value).collect())
            .unwrap_or_default();
        return Value::Array(items);
    }
    if let Some(map) = obj.get("mapValue") {
        return from_firestore_document(map);
    }

    Value::Null
}
