use serde_json::Value;

/// Whether an update response body acknowledges a stored entry.
///
/// The platform answers an accepted update with the new entry id and a
/// rejected one with `0`. Any number greater than zero counts, whether it
/// arrives as a JSON number or as numeric text.
pub fn is_positive_ack(body: &Value) -> bool {
    match body {
        Value::Number(number) => number.as_f64().is_some_and(|value| value > 0.0),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .is_ok_and(|value| value > 0.0),
        Value::Bool(flag) => *flag,
        _ => false,
    }
}
