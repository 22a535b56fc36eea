//! Metadata → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): `<key padded to 30> <value>` table
//! - **JSON** (`--json`): pretty-printed object, 4-space indent

use modelspec_core::{Error, Metadata};
use modelspec_editor::{render_export, render_table, ExportFormat};
use modelspec_integrity::HashCheck;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Printed when a checkpoint carries no metadata.
pub const NO_METADATA: &str = "Model does not have metadata.";

/// Format a metadata mapping.
pub fn format_metadata(metadata: &Metadata, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => render_export(metadata, ExportFormat::Json)
            .unwrap_or_else(|e| format_error(&e, mode)),
        OutputMode::Human if metadata.is_empty() => NO_METADATA.to_string(),
        OutputMode::Human => render_table(metadata),
    }
}

/// Format the outcome of a hash check.
pub fn format_hash_check(check: &HashCheck, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let value = match check {
                HashCheck::Missing => serde_json::json!({ "hash": "missing" }),
                HashCheck::Match => serde_json::json!({ "hash": "match" }),
                HashCheck::Mismatch { stored, computed } => serde_json::json!({
                    "hash": "mismatch",
                    "stored": stored,
                    "computed": computed,
                }),
            };
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputMode::Human => match check {
            HashCheck::Missing => "Hash: not present".to_string(),
            HashCheck::Match => "Hash: OK".to_string(),
            HashCheck::Mismatch { stored, computed } => {
                format!("Hash: MISMATCH\n  stored:   {}\n  computed: {}", stored, computed)
            }
        },
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": format!("{}", err)
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}
