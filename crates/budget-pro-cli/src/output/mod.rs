pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pull the schedule's `lines` array out of a result object, if present.
/// Schedule output is rendered row-per-period; everything else falls back
/// to field/value rendering.
pub(crate) fn schedule_lines(result: &Value) -> Option<&Vec<Value>> {
    result
        .as_object()
        .and_then(|m| m.get("lines"))
        .and_then(Value::as_array)
}
