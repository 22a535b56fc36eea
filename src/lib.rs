//! modelspec - Model Spec metadata for SafeTensors checkpoints
//!
//! Writes and reads the `modelspec.*` key/value mapping stored in the
//! `__metadata__` section of a SafeTensors container, and binds it to the
//! tensor payload with a combined SHA-256 hash.
//!
//! # Quick Start
//!
//! ```ignore
//! use modelspec::{compute_metadata, persist, Catalog, MetadataBuilder, MetadataParams, TagRequest};
//!
//! let catalog = Catalog::default();
//! let builder = MetadataBuilder::new(&catalog);
//! let request = TagRequest {
//!     checkpoint: "model.safetensors".into(),
//!     params: MetadataParams::new("sd_xl_v1_base"),
//!     add_hash: true,
//! };
//! let tagged = compute_metadata(&request, &builder)?;
//! persist(&tagged, "tagged.safetensors".as_ref())?;
//! ```
//!
//! # Architecture
//!
//! - `modelspec-core`: error type and the metadata mapping
//! - `modelspec-container`: the SafeTensors codec
//! - `modelspec-integrity`: tensor hash and combined hash
//! - `modelspec-builder`: catalogs, parameters, thumbnails
//! - `modelspec-editor`: the tag and inspect workflows

pub use modelspec_editor::*;

pub use modelspec_builder::{
    decode_data_uri, encode_data_uri, format_local_iso, image_to_data_uri, DataUri,
    DEFAULT_ARCHITECTURE, DEFAULT_TITLE,
};
pub use modelspec_container::{
    load, read_header_only, save, serialize, single_tensor_byte_span, CONTAINER_EXTENSION,
};
pub use modelspec_core::SPEC_VERSION;
pub use modelspec_integrity::{apply_hash, combined_hash, metadata_json, tensor_hash, verify_hash};
