//! Model Spec editor workflows
//!
//! Composes the codec, builder and hasher into the two user-facing flows:
//! - tag: load → build → merge → hash, then persist as a separate step
//! - inspect: header read, filtering, export, thumbnail extraction, verify

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod inspect;
pub mod tag;

pub use inspect::{
    export_metadata, export_path, has_metadata, inspect, model_name, render_export, render_table,
    save_thumbnail, verify, ExportFormat, KEY_COLUMN_WIDTH,
};
pub use tag::{compute_metadata, merge_metadata, persist, TagRequest, TaggedCheckpoint};

pub use modelspec_builder::{
    Catalog, ImageCodec, JpegCodec, MetadataBuilder, MetadataParams, Resolution, TimestampInput,
    TimestepRange,
};
pub use modelspec_container::{Container, Dtype, TensorRecord};
pub use modelspec_core::{keys, Error, Metadata, Result};
pub use modelspec_integrity::HashCheck;
