//! Thumbnail encoding and data URIs.
//!
//! Thumbnails are stored inline as `data:image/<fmt>;base64,<payload>`.
//! Encoding an image file is delegated to an [`ImageCodec`]; the default
//! [`JpegCodec`] uses the `image` crate.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageOutputFormat};
use modelspec_core::{Error, Result};
use std::io::Cursor;
use std::path::Path;

/// Media subtype written for built thumbnails.
pub const JPEG_SUBTYPE: &str = "jpeg";

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Encodes an image file to JPEG bytes.
pub trait ImageCodec {
    /// Read the image at `path` and return JPEG-encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns a thumbnail error if the image cannot be read or encoded.
    fn encode_jpeg(&self, path: &Path) -> Result<Vec<u8>>;
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegCodec {
    /// JPEG quality, 1-100
    pub quality: u8,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageCodec for JpegCodec {
    fn encode_jpeg(&self, path: &Path) -> Result<Vec<u8>> {
        let img = image::open(path).map_err(|e| Error::thumbnail(path, e))?;
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut out = Cursor::new(Vec::new());
        rgb.write_to(&mut out, ImageOutputFormat::Jpeg(self.quality))
            .map_err(|e| Error::thumbnail(path, e))?;
        Ok(out.into_inner())
    }
}

/// A decoded thumbnail data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media subtype, e.g. `jpeg`; doubles as the file extension
    pub format: String,
    /// Decoded payload bytes
    pub bytes: Vec<u8>,
}

/// Build `data:image/<subtype>;base64,<payload>`.
pub fn encode_data_uri(subtype: &str, bytes: &[u8]) -> String {
    format!("data:image/{};base64,{}", subtype, BASE64.encode(bytes))
}

/// Split a data URI into its media subtype and decoded payload.
///
/// # Errors
///
/// Returns a format error if there is no `,` separating prefix and payload,
/// the prefix has no `/`-delimited subtype, or the payload is not base64.
pub fn decode_data_uri(uri: &str) -> Result<DataUri> {
    let (prefix, payload) = uri
        .split_once(',')
        .ok_or_else(|| Error::format("thumbnail data URI has no ',' before the payload"))?;
    let format = prefix
        .split('/')
        .nth(1)
        .and_then(|rest| rest.split(';').next())
        .filter(|subtype| !subtype.is_empty())
        .ok_or_else(|| {
            Error::format(format!(
                "thumbnail data URI prefix '{}' has no media subtype",
                prefix
            ))
        })?;
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| Error::format(format!("thumbnail payload is not base64: {}", e)))?;
    Ok(DataUri {
        format: format.to_string(),
        bytes,
    })
}

/// Encode an image file as a JPEG data URI.
pub fn image_to_data_uri(codec: &dyn ImageCodec, path: &Path) -> Result<String> {
    let jpeg = codec.encode_jpeg(path)?;
    Ok(encode_data_uri(JPEG_SUBTYPE, &jpeg))
}
