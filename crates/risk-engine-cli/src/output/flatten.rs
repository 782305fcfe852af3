use serde_json::{Map, Value};

/// Flatten nested objects into dotted `field, value` rows, in key order.
/// Arrays of objects are left to the caller (see `split_rows`).
pub fn flatten_object(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        push_rows(key, val, &mut rows);
    }
    rows
}

fn push_rows(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(inner) => {
            for (key, val) in inner {
                push_rows(&format!("{prefix}.{key}"), val, rows);
            }
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            for (i, item) in items.iter().enumerate() {
                push_rows(&format!("{prefix}.{i}"), item, rows);
            }
        }
        other => rows.push((prefix.to_string(), scalar(other))),
    }
}

/// Split a result into scalar fields and its first array of objects
/// (portfolio positions), so the array can be rendered as its own grid.
pub fn split_rows(map: &Map<String, Value>) -> (Map<String, Value>, Option<(String, Vec<Value>)>) {
    let mut fields = Map::new();
    let mut rows = None;
    for (key, val) in map {
        match val {
            Value::Array(items) if rows.is_none() && is_object_list(items) => {
                rows = Some((key.clone(), items.clone()));
            }
            _ => {
                fields.insert(key.clone(), val.clone());
            }
        }
    }
    (fields, rows)
}

fn is_object_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

/// Scalar rendering shared by the table and CSV writers.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
