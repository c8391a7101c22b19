use serde_json::Value;
use std::io;

/// Write output as CSV to stdout. Row-shaped results (schedules, series)
/// become one CSV row per month; anything else becomes field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let payload = match value {
        Value::Object(map) => map.get("result").unwrap_or(value),
        _ => value,
    };

    match payload {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        Value::Object(result) => {
            if let Some(Value::Array(rows)) = result.get("rows") {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(payload)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    // Per-track maps expand into one column per track id.
    let mut headers: Vec<String> = Vec::new();
    for (key, val) in first {
        match val {
            Value::Object(nested) => {
                headers.extend(nested.keys().map(|id| format!("{key}.{id}")));
            }
            _ => headers.push(key.clone()),
        }
    }
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let record: Vec<String> = headers
                .iter()
                .map(|h| lookup(map, h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn lookup<'a>(map: &'a serde_json::Map<String, Value>, header: &str) -> Option<&'a Value> {
    match header.split_once('.') {
        Some((outer, inner)) => map.get(outer).and_then(|v| v.get(inner)),
        None => map.get(header),
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
