//! Integrity hashing for Model Spec containers
//!
//! Binds a metadata mapping to the tensor payload it describes:
//! - json: canonical sorted-key rendering of the mapping
//! - hasher: tensor hash, combined hash, and verification

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hasher;
pub mod json;

pub use hasher::{apply_hash, combined_hash, tensor_hash, verify_hash, HashCheck, HASH_PREFIX};
pub use json::{metadata_json, CanonicalFormatter};
