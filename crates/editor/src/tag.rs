//! Write workflow: tag a checkpoint with Model Spec metadata.
//!
//! Computing the tagged metadata and writing the container are separate
//! steps. [`compute_metadata`] never touches the output path, so a caller
//! can preview the result and only then call [`persist`].

use modelspec_builder::{MetadataBuilder, MetadataParams};
use modelspec_container::{self as container, is_container_path, TensorRecord};
use modelspec_core::{keys, Metadata, Result};
use modelspec_integrity::apply_hash;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything needed to tag one checkpoint.
#[derive(Debug, Clone)]
pub struct TagRequest {
    /// Checkpoint to read
    pub checkpoint: PathBuf,
    /// Builder parameters
    pub params: MetadataParams,
    /// Add `modelspec.hash_sha256`
    pub add_hash: bool,
}

/// A checkpoint with its merged metadata, ready to persist.
#[derive(Debug, Clone)]
pub struct TaggedCheckpoint {
    /// Tensors exactly as loaded
    pub tensors: Vec<TensorRecord>,
    /// Existing metadata overlaid with the built fields
    pub metadata: Metadata,
}

/// Overlay built fields onto existing metadata.
///
/// Keys the builder produced replace existing values; every other existing
/// key is kept unchanged.
pub fn merge_metadata(existing: Metadata, built: &Metadata) -> Metadata {
    let mut merged = existing;
    merged.merge(built);
    merged
}

/// Load the checkpoint, build and merge metadata, and optionally hash.
///
/// Existing metadata is only picked up from `.safetensors` files; any other
/// extension starts from an empty mapping.
///
/// # Errors
///
/// Propagates builder errors before the checkpoint is read, then container
/// and hashing errors.
pub fn compute_metadata(
    request: &TagRequest,
    builder: &MetadataBuilder<'_>,
) -> Result<TaggedCheckpoint> {
    let built = builder.build(&request.params)?;

    info!(path = %request.checkpoint.display(), "Loading checkpoint");
    let loaded = container::load(&request.checkpoint)?;
    info!(tensors = loaded.tensors.len(), "Checkpoint loaded");

    let existing = if is_container_path(&request.checkpoint) {
        loaded.metadata
    } else {
        Metadata::new()
    };
    if !existing.is_empty() {
        info!(keys = existing.len(), "Existing metadata found");
    }

    let mut metadata = merge_metadata(existing, &built);
    debug!(keys = metadata.len(), "Merged metadata");

    if request.add_hash {
        let combined = apply_hash(&mut metadata, &loaded.tensors)?;
        info!(hash = %combined, "Hash added to metadata");
    } else if metadata.contains_key(keys::HASH_SHA256) {
        warn!("Existing modelspec.hash_sha256 kept without rehashing; it may be stale");
    }

    Ok(TaggedCheckpoint {
        tensors: loaded.tensors,
        metadata,
    })
}

/// Write the tagged checkpoint to `output`.
pub fn persist(tagged: &TaggedCheckpoint, output: &Path) -> Result<()> {
    info!(path = %output.display(), "Saving model with metadata");
    container::save(output, &tagged.tensors, &tagged.metadata)?;
    info!("Model saved");
    Ok(())
}
