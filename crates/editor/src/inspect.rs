//! Read workflow: inspect, export and extract.
//!
//! Only files with the `.safetensors` extension are opened; anything else
//! reads as an empty mapping rather than an error.

use modelspec_builder::decode_data_uri;
use modelspec_container::{self as container, is_container_path};
use modelspec_core::{Error, Metadata, Result};
use modelspec_integrity::{verify_hash, HashCheck};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Width of the key column in [`render_table`].
pub const KEY_COLUMN_WIDTH: usize = 30;

/// Document format for metadata export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON, 4-space indent
    Json,
    /// TOML key/value document
    Toml,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Toml => "toml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "toml" => Ok(ExportFormat::Toml),
            other => Err(Error::input(
                "save_metadata",
                format!("unknown export format '{}', expected json or toml", other),
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Model name used for derived files: the file stem of the checkpoint.
pub fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a checkpoint's metadata without loading tensors.
///
/// With `only_modelspec`, foreign keys are dropped.
pub fn inspect(path: &Path, only_modelspec: bool) -> Result<Metadata> {
    if !is_container_path(path) {
        debug!(path = %path.display(), "Not a .safetensors file, no metadata");
        return Ok(Metadata::new());
    }
    let metadata = container::read_header_only(path)?;
    Ok(if only_modelspec {
        metadata.modelspec_only()
    } else {
        metadata
    })
}

/// Returns `true` if the checkpoint carries any metadata.
pub fn has_metadata(path: &Path) -> Result<bool> {
    Ok(!inspect(path, false)?.is_empty())
}

/// Load the full checkpoint and check its stored hash.
pub fn verify(path: &Path) -> Result<HashCheck> {
    let loaded = container::load(path)?;
    verify_hash(&loaded.metadata, &loaded.tensors)
}

/// One `"<key padded to 30> <value>"` line per entry.
pub fn render_table(metadata: &Metadata) -> String {
    let mut out = String::new();
    for (key, value) in metadata {
        let _ = writeln!(out, "{:<width$} {}", key, value, width = KEY_COLUMN_WIDTH);
    }
    out
}

/// Render the mapping as a document in `format`.
pub fn render_export(metadata: &Metadata, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => {
            let mut serializer =
                Serializer::with_formatter(Vec::new(), PrettyFormatter::with_indent(b"    "));
            metadata
                .serialize(&mut serializer)
                .map_err(|e| Error::format(format!("Failed to render JSON: {}", e)))?;
            String::from_utf8(serializer.into_inner())
                .map_err(|e| Error::format(format!("Rendered JSON is not UTF-8: {}", e)))
        }
        ExportFormat::Toml => toml::to_string(metadata)
            .map_err(|e| Error::format(format!("Failed to render TOML: {}", e))),
    }
}

/// Path `<dir>/<model name>.<ext>` for an exported document.
pub fn export_path(dir: &Path, model_path: &Path, format: ExportFormat) -> PathBuf {
    dir.join(format!("{}.{}", model_name(model_path), format.extension()))
}

/// Write the mapping to `path` in `format`.
pub fn export_metadata(metadata: &Metadata, format: ExportFormat, path: &Path) -> Result<()> {
    let document = render_export(metadata, format)?;
    std::fs::write(path, document).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), format = %format, "Metadata saved");
    Ok(())
}

/// Decode a thumbnail data URI and write it to `<stem>.<fmt>`.
///
/// Returns the path written.
pub fn save_thumbnail(data_uri: &str, stem: &Path) -> Result<PathBuf> {
    let decoded = decode_data_uri(data_uri)?;
    let mut name = stem.as_os_str().to_os_string();
    name.push(".");
    name.push(&decoded.format);
    let path = PathBuf::from(name);
    std::fs::write(&path, &decoded.bytes).map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), bytes = decoded.bytes.len(), "Thumbnail saved");
    Ok(path)
}
