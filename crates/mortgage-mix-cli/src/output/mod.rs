pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(&flatten_result(value)),
        OutputFormat::Csv => csv_out::print_csv(&flatten_result(value)),
        OutputFormat::Minimal => minimal::print_minimal(&flatten_result(value)),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The engine tags its results by operation (`{"Schedule": {...}}`,
/// `{"Series": {"Monthly": [...]}}`). The tabular formatters want the payload,
/// so strip those variant wrappers from the envelope's `result`.
fn flatten_result(value: &Value) -> Value {
    let Value::Object(envelope) = value else {
        return value.clone();
    };
    let Some(result) = envelope.get("result") else {
        return value.clone();
    };

    let mut flattened: Map<String, Value> = envelope.clone();
    flattened.insert("result".into(), strip_variants(result));
    Value::Object(flattened)
}

fn strip_variants(value: &Value) -> Value {
    let mut current = value;
    while let Value::Object(map) = current {
        match map.iter().next() {
            Some((tag, inner)) if map.len() == 1 && is_variant_tag(tag) => current = inner,
            _ => break,
        }
    }
    current.clone()
}

fn is_variant_tag(key: &str) -> bool {
    key.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
