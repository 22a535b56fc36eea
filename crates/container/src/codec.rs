//! SafeTensors container codec.
//!
//! # Binary Format
//!
//! ```text
//! header_len(u64 LE, 8) + header(JSON, header_len) + data(raw tensor bytes)
//! ```
//!
//! The JSON header maps each tensor name to
//! `{"dtype": .., "shape": [..], "data_offsets": [start, end]}` with offsets
//! relative to the start of the data region. The reserved `__metadata__`
//! entry holds the string-to-string [`Metadata`].
//!
//! Offsets must be contiguous and non-overlapping in declaration order, and
//! the data region ends exactly at the last tensor's end offset. Written
//! headers are padded with spaces to a multiple of 8 bytes.

use crate::dtype::Dtype;
use crate::tensor::{expected_len, TensorRecord};
use modelspec_core::{Error, Metadata, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Size of the little-endian header length prefix.
pub const HEADER_LEN_SIZE: usize = 8;

/// Header entry reserved for the metadata mapping.
pub const METADATA_KEY: &str = "__metadata__";

/// Written headers are padded to this alignment.
pub const HEADER_ALIGNMENT: usize = 8;

/// File extension of SafeTensors containers.
pub const CONTAINER_EXTENSION: &str = "safetensors";

/// Tensor name used for the isolated single-tensor container.
const SPAN_TENSOR_NAME: &str = "tensor";

/// A container fully loaded into memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Tensors in declaration order
    pub tensors: Vec<TensorRecord>,
    /// The `__metadata__` entry, empty when absent
    pub metadata: Metadata,
}

/// Tensor descriptor as stored in the header.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TensorInfo {
    dtype: Dtype,
    shape: Vec<usize>,
    data_offsets: [usize; 2],
}

/// Parsed header: descriptors sorted by start offset plus metadata.
struct Header {
    tensors: Vec<(String, TensorInfo)>,
    metadata: Metadata,
}

/// Returns `true` if the path carries the `.safetensors` extension.
pub fn is_container_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == CONTAINER_EXTENSION)
        .unwrap_or(false)
}

/// Load every tensor and the metadata from a container file.
///
/// # Errors
///
/// `Format` if the length prefix is missing, the declared header length
/// exceeds the file, the header is not valid JSON, or the tensor offsets
/// do not tile the data region. `Io` if the file cannot be read.
pub fn load(path: &Path) -> Result<Container> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let container = from_bytes(&bytes).map_err(|e| annotate(e, path))?;
    debug!(
        path = %path.display(),
        tensors = container.tensors.len(),
        metadata_keys = container.metadata.len(),
        "Loaded container"
    );
    Ok(container)
}

/// Decode a container from raw bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<Container> {
    let header_len = read_header_len(bytes)?;
    let data_start = data_start(header_len, bytes.len() as u64)?;

    let header = parse_header(&bytes[HEADER_LEN_SIZE..data_start], bytes.len() - data_start)?;
    let data = &bytes[data_start..];

    let tensors = header
        .tensors
        .into_iter()
        .map(|(name, info)| {
            let [start, end] = info.data_offsets;
            TensorRecord {
                name,
                dtype: info.dtype,
                shape: info.shape,
                data: data[start..end].to_vec(),
            }
        })
        .collect();

    Ok(Container {
        tensors,
        metadata: header.metadata,
    })
}

/// Read only the length prefix and JSON header of a container.
///
/// Tensor data is never materialized; the header is still validated against
/// the size of the data region on disk.
pub fn read_header_only(path: &Path) -> Result<Metadata> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let file_len = file.metadata().map_err(|e| Error::io(path, e))?.len();

    let mut prefix = [0u8; HEADER_LEN_SIZE];
    file.read_exact(&mut prefix).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            annotate(
                Error::format(format!("File too short for header length ({} bytes)", file_len)),
                path,
            )
        } else {
            Error::io(path, e)
        }
    })?;
    let header_len = u64::from_le_bytes(prefix);
    let data_start = data_start(header_len, file_len).map_err(|e| annotate(e, path))?;

    let mut header_bytes = vec![0u8; data_start - HEADER_LEN_SIZE];
    file.read_exact(&mut header_bytes).map_err(|e| Error::io(path, e))?;

    let header = parse_header(&header_bytes, (file_len as usize) - data_start)
        .map_err(|e| annotate(e, path))?;
    debug!(
        path = %path.display(),
        header_len,
        metadata_keys = header.metadata.len(),
        "Read container header"
    );
    Ok(header.metadata)
}

/// Serialize tensors and metadata into a complete container in memory.
pub fn serialize(tensors: &[TensorRecord], metadata: &Metadata) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_to(&mut out, tensors, metadata).map_err(|e| match e {
        WriteError::Codec(err) => err,
        WriteError::Io(io) => Error::format(format!("In-memory write failed: {}", io)),
    })?;
    Ok(out)
}

/// Write a container to `path`, replacing any existing file.
///
/// The bytes go to a sibling `.tmp` file which is synced and then renamed
/// over the destination.
pub fn save(path: &Path, tensors: &[TensorRecord], metadata: &Metadata) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    let file = File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
    let mut writer = BufWriter::new(file);
    let written = write_to(&mut writer, tensors, metadata).and_then(|_| {
        let file = writer
            .into_inner()
            .map_err(|e| WriteError::Io(e.into_error()))?;
        file.sync_all().map_err(WriteError::Io)
    });

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(match e {
            WriteError::Codec(err) => err,
            WriteError::Io(io) => Error::io(&temp_path, io),
        });
    }

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    debug!(
        path = %path.display(),
        tensors = tensors.len(),
        metadata_keys = metadata.len(),
        "Saved container"
    );
    Ok(())
}

/// Raw bytes of one tensor as the container format lays them out.
///
/// Serializes a container holding only `record`, reads the header length
/// back from that container's own prefix and returns everything from
/// `header_len + 8` onward.
pub fn single_tensor_byte_span(record: &TensorRecord) -> Result<Vec<u8>> {
    let isolated = TensorRecord {
        name: SPAN_TENSOR_NAME.to_string(),
        dtype: record.dtype,
        shape: record.shape.clone(),
        data: record.data.clone(),
    };
    let mut bytes = serialize(std::slice::from_ref(&isolated), &Metadata::new())?;
    let header_len = read_header_len(&bytes)?;
    let offset = data_start(header_len, bytes.len() as u64)?;
    Ok(bytes.split_off(offset))
}

// ============================================================================
// Internals
// ============================================================================

enum WriteError {
    Codec(Error),
    Io(std::io::Error),
}

fn write_to<W: Write>(
    writer: &mut W,
    tensors: &[TensorRecord],
    metadata: &Metadata,
) -> std::result::Result<(), WriteError> {
    let header = encode_header(tensors, metadata).map_err(WriteError::Codec)?;
    writer
        .write_all(&(header.len() as u64).to_le_bytes())
        .map_err(WriteError::Io)?;
    writer.write_all(&header).map_err(WriteError::Io)?;
    for tensor in tensors {
        writer.write_all(&tensor.data).map_err(WriteError::Io)?;
    }
    writer.flush().map_err(WriteError::Io)
}

/// Serialize the header in tensor order with `__metadata__` first.
struct HeaderRef<'a> {
    entries: Vec<(&'a str, TensorInfo)>,
    metadata: &'a Metadata,
}

impl Serialize for HeaderRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = self.entries.len() + usize::from(!self.metadata.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        if !self.metadata.is_empty() {
            map.serialize_entry(METADATA_KEY, self.metadata)?;
        }
        for (name, info) in &self.entries {
            map.serialize_entry(name, info)?;
        }
        map.end()
    }
}

fn encode_header(tensors: &[TensorRecord], metadata: &Metadata) -> Result<Vec<u8>> {
    let mut seen = HashSet::with_capacity(tensors.len());
    let mut entries = Vec::with_capacity(tensors.len());
    let mut offset = 0usize;

    for tensor in tensors {
        if tensor.name == METADATA_KEY {
            return Err(Error::format(format!(
                "Tensor name '{}' is reserved",
                METADATA_KEY
            )));
        }
        if !seen.insert(tensor.name.as_str()) {
            return Err(Error::format(format!(
                "Duplicate tensor name '{}'",
                tensor.name
            )));
        }
        tensor.validate()?;

        let end = offset + tensor.data.len();
        entries.push((
            tensor.name.as_str(),
            TensorInfo {
                dtype: tensor.dtype,
                shape: tensor.shape.clone(),
                data_offsets: [offset, end],
            },
        ));
        offset = end;
    }

    let mut header = serde_json::to_vec(&HeaderRef { entries, metadata })
        .map_err(|e| Error::format(format!("Failed to encode header JSON: {}", e)))?;
    let padded = (header.len() + HEADER_ALIGNMENT - 1) / HEADER_ALIGNMENT * HEADER_ALIGNMENT;
    header.resize(padded, b' ');
    Ok(header)
}

fn read_header_len(bytes: &[u8]) -> Result<u64> {
    let prefix: [u8; HEADER_LEN_SIZE] = bytes
        .get(..HEADER_LEN_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            Error::format(format!(
                "File too short for header length ({} bytes)",
                bytes.len()
            ))
        })?;
    Ok(u64::from_le_bytes(prefix))
}

/// Offset of the data region, checking the header fits in the file.
fn data_start(header_len: u64, file_len: u64) -> Result<usize> {
    let available = file_len.saturating_sub(HEADER_LEN_SIZE as u64);
    if header_len > available {
        return Err(Error::format(format!(
            "Header length {} exceeds file size {}",
            header_len, file_len
        )));
    }
    Ok(HEADER_LEN_SIZE + header_len as usize)
}

fn parse_header(header_bytes: &[u8], data_len: usize) -> Result<Header> {
    let json = std::str::from_utf8(header_bytes)
        .map_err(|e| Error::format(format!("Invalid UTF-8 in header: {}", e)))?;
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| Error::format(format!("Failed to parse header JSON: {}", e)))?;

    let mut metadata = Metadata::new();
    let mut tensors = Vec::with_capacity(raw.len());

    for (name, value) in raw {
        if name == METADATA_KEY {
            metadata = serde_json::from_value(value).map_err(|e| {
                Error::format(format!("'{}' is not a string mapping: {}", METADATA_KEY, e))
            })?;
            continue;
        }
        let info: TensorInfo = serde_json::from_value(value)
            .map_err(|e| Error::format(format!("Tensor '{}' descriptor invalid: {}", name, e)))?;
        tensors.push((name, info));
    }

    // Zero-sized tensors can share an offset; break ties by name.
    tensors.sort_by(|(a_name, a), (b_name, b)| {
        a.data_offsets
            .cmp(&b.data_offsets)
            .then_with(|| a_name.cmp(b_name))
    });
    validate_layout(&tensors, data_len)?;

    Ok(Header { tensors, metadata })
}

fn validate_layout(tensors: &[(String, TensorInfo)], data_len: usize) -> Result<()> {
    let mut cursor = 0usize;
    for (name, info) in tensors {
        let [start, end] = info.data_offsets;
        if start != cursor || end < start {
            return Err(Error::format(format!(
                "Tensor '{}' offsets [{}, {}) are not contiguous (expected start {})",
                name, start, end, cursor
            )));
        }
        let expected = expected_len(name, info.dtype, &info.shape)?;
        if end - start != expected {
            return Err(Error::format(format!(
                "Tensor '{}' spans {} bytes, {} {:?} needs {}",
                name,
                end - start,
                info.dtype,
                info.shape,
                expected
            )));
        }
        cursor = end;
    }
    if cursor != data_len {
        return Err(Error::format(format!(
            "Data region is {} bytes but tensors cover {}",
            data_len, cursor
        )));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| Error::input("output", format!("'{}' has no file name", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

fn annotate(err: Error, path: &Path) -> Error {
    match err {
        Error::Format(msg) => Error::Format(format!("{}: {}", path.display(), msg)),
        other => other,
    }
}
