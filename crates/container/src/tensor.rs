//! In-memory tensor records.

use crate::dtype::Dtype;
use modelspec_core::{Error, Result};

/// A decoded tensor: name, element type, shape and raw little-endian bytes.
///
/// The bytes are carried verbatim from the container; nothing here
/// interprets them beyond checking their length against the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorRecord {
    /// Tensor name as it appears in the header
    pub name: String,
    /// Element type
    pub dtype: Dtype,
    /// Dimension sizes, outermost first
    pub shape: Vec<usize>,
    /// Raw tensor bytes
    pub data: Vec<u8>,
}

impl TensorRecord {
    /// Create a record, checking that `data` holds exactly
    /// `product(shape) * dtype.size()` bytes.
    pub fn new(
        name: impl Into<String>,
        dtype: Dtype,
        shape: Vec<usize>,
        data: Vec<u8>,
    ) -> Result<Self> {
        let record = Self {
            name: name.into(),
            dtype,
            shape,
            data,
        };
        record.validate()?;
        Ok(record)
    }

    /// Build an `F32` record from float values.
    pub fn from_f32(name: impl Into<String>, shape: Vec<usize>, values: &[f32]) -> Result<Self> {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(name, Dtype::F32, shape, data)
    }

    /// Number of elements described by the shape (1 for a scalar).
    pub fn numel(&self) -> Result<usize> {
        numel(&self.name, &self.shape)
    }

    /// Expected byte length for this dtype and shape.
    pub fn expected_len(&self) -> Result<usize> {
        expected_len(&self.name, self.dtype, &self.shape)
    }

    /// Check the byte length against the shape.
    pub fn validate(&self) -> Result<()> {
        let expected = self.expected_len()?;
        if self.data.len() != expected {
            return Err(Error::format(format!(
                "Tensor '{}' holds {} bytes, {} {:?} needs {}",
                self.name,
                self.data.len(),
                self.dtype,
                self.shape,
                expected
            )));
        }
        Ok(())
    }
}

pub(crate) fn numel(name: &str, shape: &[usize]) -> Result<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| {
        acc.checked_mul(dim)
            .ok_or_else(|| Error::format(format!("Tensor '{}' shape {:?} overflows", name, shape)))
    })
}

pub(crate) fn expected_len(name: &str, dtype: Dtype, shape: &[usize]) -> Result<usize> {
    numel(name, shape)?
        .checked_mul(dtype.size())
        .ok_or_else(|| Error::format(format!("Tensor '{}' shape {:?} overflows", name, shape)))
}
