use serde_json::Value;

/// Print a one-line answer for the command that produced `value`.
///
/// Credit assessments print the verdict, stress tests the base and
/// adverse verdicts, portfolio runs the VaR/CVaR pair. Anything else
/// falls back to the first field of the result.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    println!("{}", summarise(result));
}

fn summarise(result: &Value) -> String {
    if let Some(decision) = result.get("decision") {
        return format!(
            "{} ({} risk, score {}): {}",
            verdict(decision),
            text(decision.get("risk_level")),
            text(result.pointer("/metrics/risk_score")),
            text(result.get("message")),
        );
    }
    if let (Some(base), Some(adverse)) = (result.get("base"), result.get("adverse")) {
        return format!(
            "base {} / adverse {} (PD change {})",
            verdict(&base["decision"]),
            verdict(&adverse["decision"]),
            text(result.get("pd_change")),
        );
    }
    if let Some(var) = result.get("value_at_risk") {
        return format!(
            "VaR {} / CVaR {} at {}%",
            text(Some(var)),
            text(result.get("conditional_value_at_risk")),
            text(result.get("confidence_level")),
        );
    }

    match result {
        Value::Object(map) => match map.iter().next() {
            Some((key, val)) => format!("{}: {}", key, text(Some(val))),
            None => String::new(),
        },
        other => text(Some(other)),
    }
}

fn verdict(decision: &Value) -> &'static str {
    match decision.get("approved").and_then(Value::as_bool) {
        Some(true) => "APPROVED",
        Some(false) => "REJECTED",
        None => "UNKNOWN",
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => "null".to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    }
}
