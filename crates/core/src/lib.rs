//! Core types for Model Spec tagging
//!
//! This crate defines the foundational types shared by every layer:
//! - Error: one variant per failure kind (format, input, thumbnail, I/O)
//! - Metadata: the `modelspec.*` string mapping stored in a container header
//! - keys: namespace prefix and well-known field names

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod metadata;

pub use error::{Error, Result};
pub use metadata::{keys, Metadata, NAMESPACE, SPEC_VERSION};
