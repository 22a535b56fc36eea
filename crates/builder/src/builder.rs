//! Metadata builder.
//!
//! Turns [`MetadataParams`] into a [`Metadata`] mapping. Pure apart from the
//! thumbnail, which is delegated to an [`ImageCodec`]. All scalar inputs are
//! parsed and validated before the codec runs, so a bad value never costs an
//! image decode.
//!
//! Unset optional fields are omitted from the output entirely.

use crate::catalog::{
    Catalog, DEFAULT_IMPLEMENTATION, DEFAULT_PREDICTION_TYPE, FALLBACK_IMPLEMENTATION,
};
use crate::params::{format_local_iso, now_epoch_seconds, MetadataParams};
use crate::thumbnail::{image_to_data_uri, ImageCodec, JpegCodec};
use modelspec_core::{keys, Metadata, Result, SPEC_VERSION};
use tracing::debug;

/// Title used when neither a title nor an adapter is given.
pub const DEFAULT_TITLE: &str = "Checkpoint";

static DEFAULT_CODEC: JpegCodec = JpegCodec {
    quality: crate::thumbnail::DEFAULT_JPEG_QUALITY,
};

/// Builds metadata mappings against an injected catalog.
pub struct MetadataBuilder<'a> {
    catalog: &'a Catalog,
    codec: &'a dyn ImageCodec,
    clock: fn() -> i64,
}

impl<'a> MetadataBuilder<'a> {
    /// Builder using the default JPEG codec and the system clock.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            codec: &DEFAULT_CODEC,
            clock: now_epoch_seconds,
        }
    }

    /// Use a different image codec for thumbnails.
    pub fn with_codec(mut self, codec: &'a dyn ImageCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Use a different clock for the default timestamp.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Build the mapping for `params`.
    ///
    /// # Errors
    ///
    /// `Input` for unknown catalog keys or an unparseable timestamp,
    /// `Thumbnail` if the image codec fails.
    pub fn build(&self, params: &MetadataParams) -> Result<Metadata> {
        let catalog = self.catalog;
        let mut metadata = Metadata::new();

        metadata.insert(keys::SAI_MODEL_SPEC, SPEC_VERSION);

        let architecture = catalog.architecture(&params.architecture)?;
        let adapter = non_empty(&params.adapter)
            .map(|key| catalog.adapter(key))
            .transpose()?;
        let architecture = match adapter {
            Some(adapter) => format!("{}/{}", architecture, adapter),
            None => architecture.to_string(),
        };
        metadata.insert(keys::ARCHITECTURE, architecture);

        let implementation_key = non_empty(&params.implementation).unwrap_or(
            if params.native_checkpoint {
                DEFAULT_IMPLEMENTATION
            } else {
                FALLBACK_IMPLEMENTATION
            },
        );
        metadata.insert(
            keys::IMPLEMENTATION,
            catalog.implementation(implementation_key)?,
        );

        let epoch = match &params.timestamp {
            Some(input) => input.epoch_seconds()?,
            None => (self.clock)(),
        };
        metadata.insert(keys::DATE, format_local_iso(epoch)?);

        let title = match (non_empty(&params.title), adapter) {
            (Some(title), _) => title.to_string(),
            (None, Some(adapter)) => format!("{}@{}", adapter, epoch),
            (None, None) => DEFAULT_TITLE.to_string(),
        };
        metadata.insert(keys::TITLE, title);

        let passthrough = [
            ("author", &params.author),
            ("description", &params.description),
            ("license", &params.license),
            ("tags", &params.tags),
            ("merged_from", &params.merged_from),
            ("usage_hint", &params.usage_hint),
            ("trigger_phrase", &params.trigger_phrase),
        ];
        for (field, value) in passthrough {
            if let Some(value) = non_empty(value) {
                metadata.set_field(field, value);
            }
        }

        if let Some(resolution) = params.resolution {
            metadata.insert(keys::RESOLUTION, resolution.to_string());
        }

        let prediction_key = non_empty(&params.prediction_type).unwrap_or(DEFAULT_PREDICTION_TYPE);
        metadata.insert(
            keys::PREDICTION_TYPE,
            catalog.prediction_type(prediction_key)?,
        );

        if let Some(range) = params.timestep_range {
            metadata.insert(keys::TIMESTEP_RANGE, range.to_string());
        }

        if let Some(layer) = params.encoder_layer {
            metadata.insert(keys::ENCODER_LAYER, layer.to_string());
        }

        if let Some(path) = &params.thumbnail {
            metadata.insert(keys::THUMBNAIL, image_to_data_uri(self.codec, path)?);
        }

        debug!(keys = metadata.len(), "Built metadata");
        Ok(metadata)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
