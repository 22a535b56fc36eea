//! Model Spec metadata builder
//!
//! - catalog: injected lookup tables for the closed-set fields
//! - params: the typed parameter set and its string parsers
//! - builder: parameters → `modelspec.*` mapping
//! - thumbnail: JPEG codec seam and data URI encode/decode

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod catalog;
pub mod params;
pub mod thumbnail;

pub use builder::{MetadataBuilder, DEFAULT_TITLE};
pub use catalog::{
    Catalog, CONFIG_FILE_NAME, DEFAULT_ARCHITECTURE, DEFAULT_IMPLEMENTATION,
    DEFAULT_PREDICTION_TYPE, FALLBACK_IMPLEMENTATION,
};
pub use params::{
    format_local_iso, now_epoch_seconds, MetadataParams, Resolution, TimestampInput,
    TimestepRange,
};
pub use thumbnail::{
    decode_data_uri, encode_data_uri, image_to_data_uri, DataUri, ImageCodec, JpegCodec,
};
