//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
pub use modelspec::{Catalog, Dtype, Metadata, MetadataBuilder, MetadataParams, TagRequest, TensorRecord};
use tempfile::TempDir;

/// Fixed clock for deterministic dates and adapter titles.
pub const FIXED_NOW: i64 = 1_700_000_000;

pub fn fixed_clock() -> i64 {
    FIXED_NOW
}

/// A small mixed-dtype tensor set.
pub fn sample_tensors() -> Vec<TensorRecord> {
    vec![
        TensorRecord::from_f32("model.w", vec![2, 3], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
        TensorRecord::new("model.b", Dtype::U8, vec![4], vec![1, 2, 3, 4]).unwrap(),
        TensorRecord::new("model.h", Dtype::F16, vec![2], vec![0x00, 0x3c, 0x00, 0x40]).unwrap(),
    ]
}

/// Temporary directory holding the files of one test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a checkpoint with [`sample_tensors`] and `metadata`.
    pub fn checkpoint(&self, name: &str, metadata: &Metadata) -> PathBuf {
        let path = self.path(name);
        modelspec::save(&path, &sample_tensors(), metadata).unwrap();
        path
    }

    /// Write a gradient PNG and return its path.
    pub fn png(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        let img = ImageBuffer::from_fn(32, 16, |x, y| Rgb([(x * 8) as u8, (y * 16) as u8, 64u8]));
        img.save(&path).unwrap();
        path
    }
}

/// Builder over `catalog` with the fixed clock.
pub fn builder(catalog: &Catalog) -> MetadataBuilder<'_> {
    MetadataBuilder::new(catalog).with_clock(fixed_clock)
}

pub fn request(checkpoint: &Path, params: MetadataParams, add_hash: bool) -> TagRequest {
    TagRequest {
        checkpoint: checkpoint.to_path_buf(),
        params,
        add_hash,
    }
}

pub fn metadata(entries: &[(&str, &str)]) -> Metadata {
    entries.iter().copied().collect()
}
