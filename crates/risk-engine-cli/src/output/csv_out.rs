use serde_json::Value;
use std::io;

use super::flatten::{flatten_object, scalar};

/// Write output as two-column `field,value` CSV to stdout. Nested results
/// use dotted field names (`metrics.risk_score`, `positions.0.weight`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let rows = match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => flatten_object(result),
            _ => flatten_object(map),
        },
        other => vec![("value".to_string(), scalar(other))],
    };

    let _ = wtr.write_record(["field", "value"]);
    for (field, val) in rows {
        let _ = wtr.write_record([field, val]);
    }
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings.iter().filter_map(Value::as_str) {
            let _ = wtr.write_record(["warning", w]);
        }
    }

    let _ = wtr.flush();
}
