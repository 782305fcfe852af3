use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::flatten::{flatten_object, scalar, split_rows};

/// Columns shown for each portfolio position, when present.
const POSITION_COLUMNS: [&str; 7] = [
    "symbol",
    "quantity",
    "current_price",
    "daily_return",
    "value",
    "weight",
    "status",
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            _ => print_fields(map),
        },
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let (fields, rows) = split_rows(result);
    print_fields(&fields);

    if let Some((name, items)) = rows {
        println!("\n{}:", name);
        print_rows(&items);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_object(map) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(items: &[Value]) {
    let Some(Value::Object(first)) = items.first() else {
        return;
    };
    let headers: Vec<&str> = if POSITION_COLUMNS.iter().all(|c| first.contains_key(*c)) {
        POSITION_COLUMNS.to_vec()
    } else {
        first.keys().map(String::as_str).collect()
    };

    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for item in items {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}
