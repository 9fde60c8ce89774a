use serde_json::Value;

/// Quantity of a position entry
///
/// Accepts the decimal strings the API sends as well as plain JSON numbers.
#[must_use]
pub fn position_quantity(position: &Value) -> Option<f64> {
    let quantity = match position.get("quantity")? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    quantity.filter(|q| q.is_finite())
}

/// Whether a position entry still holds shares.
/// Missing or unparsable quantities count as inactive.
#[must_use]
pub fn is_active_position(position: &Value) -> bool {
    position_quantity(position).is_some_and(|q| q != 0.0)
}

/// Keeps the entries with a non-zero quantity, in their original order
#[must_use]
pub fn filter_active_positions(positions: &[Value]) -> Vec<Value> {
    positions
        .iter()
        .filter(|p| is_active_position(p))
        .cloned()
        .collect()
}
