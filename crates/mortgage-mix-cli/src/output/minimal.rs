use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for the headline figure of each operation in the result, then in
/// its `summary`, and falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "monthly_payment",
        "total_monthly_payment",
        "best_by_monthly_payment",
    ];

    let scopes = [Some(result_obj), result_obj.get("summary")];
    for scope in scopes.into_iter().flatten() {
        for key in &priority_keys {
            if let Some(val) = scope.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        // A comparison pick: name the winning mix.
        Value::Object(map) if map.contains_key("mix_id") => {
            let id = map.get("mix_id").map(format_minimal).unwrap_or_default();
            let val = map.get("value").map(format_minimal).unwrap_or_default();
            format!("{id} ({val})")
        }
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
