//! Combined hash behavior on written checkpoints.

use crate::common::*;
use modelspec::{
    apply_hash, combined_hash, compute_metadata, keys, persist, tensor_hash, verify,
    verify_hash, HashCheck,
};

fn hashed_checkpoint(ws: &Workspace) -> std::path::PathBuf {
    let input = ws.checkpoint("input.safetensors", &Metadata::new());
    let output = ws.path("hashed.safetensors");
    let catalog = Catalog::default();
    let tagged = compute_metadata(
        &request(&input, MetadataParams::default(), true),
        &builder(&catalog),
    )
    .unwrap();
    persist(&tagged, &output).unwrap();
    output
}

#[test]
fn hash_is_deterministic() {
    let md = metadata(&[("modelspec.title", "T"), ("modelspec.author", "A")]);
    let tensors = sample_tensors();
    assert_eq!(
        combined_hash(&md, &tensors).unwrap(),
        combined_hash(&md.clone(), &tensors.clone()).unwrap()
    );
}

#[test]
fn hash_shape() {
    let hash = combined_hash(&Metadata::new(), &sample_tensors()).unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66);
    assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn hash_changes_with_metadata_value() {
    let tensors = sample_tensors();
    let a = combined_hash(&metadata(&[("modelspec.title", "A")]), &tensors).unwrap();
    let b = combined_hash(&metadata(&[("modelspec.title", "B")]), &tensors).unwrap();
    assert_ne!(a, b);
}

#[test]
fn hash_changes_with_tensor_byte() {
    let md = metadata(&[("modelspec.title", "T")]);
    let tensors = sample_tensors();
    let mut flipped = tensors.clone();
    flipped[1].data[0] ^= 0x01;
    assert_ne!(
        combined_hash(&md, &tensors).unwrap(),
        combined_hash(&md, &flipped).unwrap()
    );
    assert_ne!(tensor_hash(&tensors).unwrap(), tensor_hash(&flipped).unwrap());
}

#[test]
fn tensor_names_do_not_affect_tensor_hash() {
    let tensors = sample_tensors();
    let mut renamed = tensors.clone();
    for (i, t) in renamed.iter_mut().enumerate() {
        t.name = format!("renamed.{}", i);
    }
    assert_eq!(tensor_hash(&tensors).unwrap(), tensor_hash(&renamed).unwrap());
}

#[test]
fn rehash_is_idempotent() {
    let tensors = sample_tensors();
    let mut md = metadata(&[("modelspec.title", "T")]);
    let first = apply_hash(&mut md, &tensors).unwrap();
    let second = apply_hash(&mut md, &tensors).unwrap();
    assert_eq!(first, second);
    assert_eq!(md.get(keys::HASH_SHA256), Some(first.as_str()));
}

#[test]
fn persisted_hash_verifies() {
    let ws = Workspace::new();
    let path = hashed_checkpoint(&ws);
    assert_eq!(verify(&path).unwrap(), HashCheck::Match);
}

#[test]
fn edited_metadata_fails_verification() {
    let ws = Workspace::new();
    let path = hashed_checkpoint(&ws);

    let mut loaded = modelspec::load(&path).unwrap();
    loaded.metadata.insert("modelspec.author", "Someone Else");
    modelspec::save(&path, &loaded.tensors, &loaded.metadata).unwrap();

    match verify(&path).unwrap() {
        HashCheck::Mismatch { stored, computed } => assert_ne!(stored, computed),
        other => panic!("expected mismatch, got {:?}", other),
    }
}

#[test]
fn unhashed_checkpoint_reports_missing() {
    let md = metadata(&[("modelspec.title", "T")]);
    assert_eq!(verify_hash(&md, &sample_tensors()).unwrap(), HashCheck::Missing);
}
