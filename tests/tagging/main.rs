//! Tagging Integration Tests
//!
//! End-to-end tests across the codec, builder, hasher and workflows:
//! - workflow: tag → persist → inspect, merge, export, thumbnails
//! - integrity: combined hash determinism, sensitivity and verification
//! - builder_rules: field formatting and omission on written files
//! - properties: proptest round trips over generated mappings

#[path = "../common/mod.rs"]
mod common;

mod builder_rules;
mod integrity;
mod properties;
mod workflow;
