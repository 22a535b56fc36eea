//! SafeTensors container codec
//!
//! The only layer that touches raw container bytes:
//! - Dtype: element type tags and sizes
//! - TensorRecord: a decoded tensor with its raw bytes
//! - codec: load, header-only read, save, and the single-tensor byte span
//!   used by the integrity hash

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod dtype;
pub mod tensor;

pub use codec::{
    from_bytes, is_container_path, load, read_header_only, save, serialize,
    single_tensor_byte_span, Container, CONTAINER_EXTENSION, HEADER_ALIGNMENT, HEADER_LEN_SIZE,
    METADATA_KEY,
};
pub use dtype::Dtype;
pub use tensor::TensorRecord;
