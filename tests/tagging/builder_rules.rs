//! Field rules as they land in written checkpoints.

use crate::common::*;
use modelspec::{
    compute_metadata, format_local_iso, keys, persist, inspect, Resolution, TimestepRange,
    SPEC_VERSION,
};

fn tag(params: MetadataParams) -> Metadata {
    tag_with(&Catalog::default(), params)
}

fn tag_with(catalog: &Catalog, params: MetadataParams) -> Metadata {
    let ws = Workspace::new();
    let input = ws.checkpoint("input.safetensors", &Metadata::new());
    let output = ws.path("output.safetensors");
    let tagged = compute_metadata(&request(&input, params, false), &builder(catalog)).unwrap();
    persist(&tagged, &output).unwrap();
    inspect(&output, false).unwrap()
}

#[test]
fn required_fields_are_always_present() {
    let md = tag(MetadataParams::default());
    assert_eq!(md.get(keys::SAI_MODEL_SPEC), Some(SPEC_VERSION));
    assert_eq!(md.get(keys::ARCHITECTURE), Some("stable-diffusion-v1"));
    assert_eq!(
        md.get(keys::IMPLEMENTATION),
        Some("https://github.com/Stability-AI/generative-models")
    );
    assert_eq!(md.get(keys::TITLE), Some("Checkpoint"));
    assert_eq!(md.get(keys::PREDICTION_TYPE), Some("epsilon"));
    assert_eq!(
        md.get(keys::DATE),
        Some(format_local_iso(FIXED_NOW).unwrap().as_str())
    );
}

#[test]
fn empty_and_absent_fields_are_omitted() {
    let md = tag(MetadataParams {
        author: Some(String::new()),
        description: None,
        license: Some(String::new()),
        ..MetadataParams::default()
    });
    for field in ["author", "description", "license", "tags", "usage_hint"] {
        assert!(!md.contains_key(&format!("modelspec.{}", field)), "{}", field);
    }
    assert!(!md.contains_key(keys::RESOLUTION));
    assert!(!md.contains_key(keys::TIMESTEP_RANGE));
    assert!(!md.contains_key(keys::ENCODER_LAYER));
    assert!(!md.contains_key(keys::THUMBNAIL));
}

#[test]
fn resolution_and_timesteps_formatting() {
    let square = tag(MetadataParams {
        resolution: Some(Resolution::square(512)),
        timestep_range: Some(TimestepRange::single(20)),
        ..MetadataParams::default()
    });
    assert_eq!(square.get(keys::RESOLUTION), Some("512x512"));
    assert_eq!(square.get(keys::TIMESTEP_RANGE), Some("20,20"));

    let pair = tag(MetadataParams {
        resolution: Some((512, 768).into()),
        timestep_range: Some((0, 50).into()),
        ..MetadataParams::default()
    });
    assert_eq!(pair.get(keys::RESOLUTION), Some("512x768"));
    assert_eq!(pair.get(keys::TIMESTEP_RANGE), Some("0,50"));
}

#[test]
fn zero_encoder_layer_is_written() {
    let md = tag(MetadataParams {
        encoder_layer: Some(0),
        ..MetadataParams::default()
    });
    assert_eq!(md.get(keys::ENCODER_LAYER), Some("0"));
}

#[test]
fn adapter_extends_architecture_and_titles() {
    let md = tag(MetadataParams {
        adapter: Some("lora".into()),
        native_checkpoint: false,
        ..MetadataParams::default()
    });
    assert_eq!(md.get(keys::ARCHITECTURE), Some("stable-diffusion-v1/lora"));
    assert_eq!(md.get(keys::TITLE), Some(format!("lora@{}", FIXED_NOW).as_str()));
    assert_eq!(md.get(keys::IMPLEMENTATION), Some("diffusers"));
}

#[test]
fn custom_catalog_from_file() {
    let ws = Workspace::new();
    let config = ws.path("modelspec.toml");
    let custom = Catalog::default_toml().replace(
        "sd_v1 = \"stable-diffusion-v1\"",
        "sd_v1 = \"stable-diffusion-v1\"\nflux_dev = \"flux-1-dev\"",
    );
    std::fs::write(&config, custom).unwrap();

    let catalog = Catalog::from_file(&config).unwrap();
    let md = tag_with(&catalog, MetadataParams::new("flux_dev"));
    assert_eq!(md.get(keys::ARCHITECTURE), Some("flux-1-dev"));
}

#[test]
fn unknown_catalog_key_is_rejected() {
    let ws = Workspace::new();
    let input = ws.checkpoint("input.safetensors", &Metadata::new());
    let catalog = Catalog::default();
    let err = compute_metadata(
        &request(
            &input,
            MetadataParams {
                prediction_type: Some("x0".into()),
                ..MetadataParams::default()
            },
            false,
        ),
        &builder(&catalog),
    )
    .unwrap_err();
    assert!(err.is_input());
    assert!(err.to_string().contains("x0"));
}
