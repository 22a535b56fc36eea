//! Canonical JSON rendering of a metadata mapping for hashing.
//!
//! The rendering must be byte-identical to what existing Model Spec writers
//! feed into the hash: keys sorted, `", "` between entries, `": "` between
//! key and value, and every character outside printable ASCII escaped as
//! `\uXXXX` (UTF-16 code units, lowercase hex).

use modelspec_core::{Error, Metadata, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// serde_json formatter producing the canonical spacing and escaping.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Render a mapping as canonical sorted-key JSON.
pub fn metadata_json(metadata: &Metadata) -> Result<String> {
    let mut serializer = Serializer::with_formatter(Vec::new(), CanonicalFormatter);
    metadata
        .serialize(&mut serializer)
        .map_err(|e| Error::format(format!("Failed to render metadata JSON: {}", e)))?;
    String::from_utf8(serializer.into_inner())
        .map_err(|e| Error::format(format!("Metadata JSON is not UTF-8: {}", e)))
}
