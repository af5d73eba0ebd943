//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{BulkloadArgs, OutputFormat};
use crate::error::Result;
use crate::import::ImportReport;

/// Result structure for the headers command.
#[derive(Debug, Serialize, Deserialize)]
pub struct HeadersResult {
    pub file: String,
    pub fields: Vec<String>,
}

/// Result structure for the import command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(flatten)]
    pub report: ImportReport,
    pub dry_run: bool,
    pub duration_ms: u64,
    pub docs_per_second: f64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &BulkloadArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &BulkloadArgs) -> Result<()> {
    let value = serde_json::to_value(result)?;
    for line in render_human(&value) {
        println!("{line}");
    }
    if args.verbosity() > 0 && !message.is_empty() {
        println!();
        println!("{message}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &BulkloadArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Render a result as lines of text.
///
/// Headers results print one field per line so the output can be piped;
/// import results print a short summary.
fn render_human(value: &serde_json::Value) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(obj) = value.as_object() else {
        lines.push(value.to_string());
        return lines;
    };

    if obj.contains_key("summary") || obj.contains_key("skipped") {
        render_import(obj, &mut lines);
    } else if let Some(fields) = obj.get("fields").and_then(|f| f.as_array()) {
        lines.extend(fields.iter().filter_map(|f| f.as_str()).map(str::to_string));
    } else {
        for (key, val) in obj {
            lines.push(format!("{key}: {val}"));
        }
    }
    lines
}

fn render_import(obj: &serde_json::Map<String, serde_json::Value>, lines: &mut Vec<String>) {
    let index = obj.get("index").and_then(|i| i.as_str()).unwrap_or("?");
    let dry_run = obj.get("dry_run").and_then(|d| d.as_bool()).unwrap_or(false);
    let prefix = if dry_run { "[dry run] " } else { "" };

    if obj.get("skipped").and_then(|s| s.as_bool()).unwrap_or(false) {
        lines.push(format!("{prefix}Index {index} already exists, nothing imported"));
        lines.push("Use --delete-index to replace it".to_string());
        return;
    }

    if obj
        .get("deleted_existing")
        .and_then(|d| d.as_bool())
        .unwrap_or(false)
    {
        lines.push(format!("{prefix}Deleted existing index {index}"));
    }

    if let Some(fields) = obj.get("fields").and_then(|f| f.as_array()) {
        let names: Vec<&str> = fields.iter().filter_map(|f| f.as_str()).collect();
        lines.push(format!("Fields ({}): {}", names.len(), names.join(", ")));
    }

    if let Some(summary) = obj.get("summary").and_then(|s| s.as_object()) {
        let indexed = summary.get("indexed").and_then(|n| n.as_u64()).unwrap_or(0);
        let failed = summary.get("failed").and_then(|n| n.as_u64()).unwrap_or(0);
        let batches = summary.get("batches").and_then(|n| n.as_u64()).unwrap_or(0);
        lines.push(format!(
            "{prefix}Indexed {indexed} documents into {index} in {batches} batches ({failed} rejected)"
        ));
        if let Some(errors) = summary.get("errors").and_then(|e| e.as_array()) {
            for error in errors.iter().filter_map(|e| e.as_str()).take(10) {
                lines.push(format!("  {error}"));
            }
            if errors.len() > 10 {
                lines.push(format!("  ... and {} more", errors.len() - 10));
            }
        }
    }

    if let Some(duration) = obj.get("duration_ms").and_then(|d| d.as_u64()) {
        let rate = obj
            .get("docs_per_second")
            .and_then(|r| r.as_f64())
            .unwrap_or(0.0);
        lines.push(format!("Time: {duration}ms ({rate:.1} docs/s)"));
    }
}
