//! Combined integrity hash.
//!
//! # Algorithm
//!
//! 1. For each tensor in declared order, serialize a one-tensor container,
//!    take its data region and feed it into a single running SHA-256.
//! 2. `tensor_hash = "0x" + hex(digest)`.
//! 3. Render the metadata (without `modelspec.hash_sha256`) as canonical JSON.
//! 4. `combined = "0x" + hex(SHA-256(json + tensor_hash))`.
//! 5. Store `combined` under `modelspec.hash_sha256`.
//!
//! All inputs are bytes or pre-formatted strings, so the result does not
//! depend on platform, locale or float formatting.

use crate::json::metadata_json;
use modelspec_container::{single_tensor_byte_span, TensorRecord};
use modelspec_core::{keys, Metadata, Result};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use tracing::debug;

/// Prefix on every rendered digest.
pub const HASH_PREFIX: &str = "0x";

/// Outcome of checking a stored hash against freshly computed contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashCheck {
    /// The mapping carries no `modelspec.hash_sha256`
    Missing,
    /// Stored and computed hashes agree
    Match,
    /// Stored and computed hashes differ
    Mismatch {
        /// Value found in the mapping
        stored: String,
        /// Value computed from the current contents
        computed: String,
    },
}

/// Hash the tensor payload: one accumulator across every tensor's span.
pub fn tensor_hash(tensors: &[TensorRecord]) -> Result<String> {
    let mut hasher = Sha256::new();
    for tensor in tensors {
        let span = single_tensor_byte_span(tensor)?;
        hasher.update(&span);
    }
    Ok(render_digest(&hasher.finalize()))
}

/// Compute the combined hash of a mapping and its tensors.
///
/// Any existing `modelspec.hash_sha256` entry is left out of the JSON, so
/// re-hashing an already hashed mapping gives the same value.
pub fn combined_hash(metadata: &Metadata, tensors: &[TensorRecord]) -> Result<String> {
    let mut unhashed = metadata.clone();
    unhashed.remove(keys::HASH_SHA256);

    let json = metadata_json(&unhashed)?;
    let tensors_digest = tensor_hash(tensors)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hasher.update(tensors_digest.as_bytes());
    let combined = render_digest(&hasher.finalize());

    debug!(
        tensors = tensors.len(),
        metadata_keys = unhashed.len(),
        tensor_hash = %tensors_digest,
        combined = %combined,
        "Computed integrity hash"
    );
    Ok(combined)
}

/// Compute the combined hash and store it in the mapping.
pub fn apply_hash(metadata: &mut Metadata, tensors: &[TensorRecord]) -> Result<String> {
    let combined = combined_hash(metadata, tensors)?;
    metadata.insert(keys::HASH_SHA256, combined.clone());
    Ok(combined)
}

/// Recompute the combined hash and compare it to the stored value.
pub fn verify_hash(metadata: &Metadata, tensors: &[TensorRecord]) -> Result<HashCheck> {
    let Some(stored) = metadata.get(keys::HASH_SHA256) else {
        return Ok(HashCheck::Missing);
    };
    let computed = combined_hash(metadata, tensors)?;
    if computed == stored {
        Ok(HashCheck::Match)
    } else {
        Ok(HashCheck::Mismatch {
            stored: stored.to_string(),
            computed,
        })
    }
}

fn render_digest(digest: &[u8]) -> String {
    let mut out = String::with_capacity(HASH_PREFIX.len() + digest.len() * 2);
    out.push_str(HASH_PREFIX);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
