//! Write/read workflows against real files.

use crate::common::*;
use modelspec::{
    compute_metadata, decode_data_uri, export_metadata, export_path, has_metadata, inspect,
    keys, persist, save_thumbnail, ExportFormat, ImageCodec, JpegCodec,
};

#[test]
fn tag_then_inspect_round_trip() {
    let ws = Workspace::new();
    let input = ws.checkpoint("input.safetensors", &Metadata::new());
    let output = ws.path("tagged.safetensors");

    let catalog = Catalog::default();
    let params = MetadataParams {
        title: Some("Round Trip".into()),
        author: Some("Tester".into()),
        resolution: Some((512, 768).into()),
        ..MetadataParams::new("sd_v2_768_v")
    };
    let tagged = compute_metadata(&request(&input, params, true), &builder(&catalog)).unwrap();
    persist(&tagged, &output).unwrap();

    assert_eq!(inspect(&output, false).unwrap(), tagged.metadata);
    let written = modelspec::load(&output).unwrap();
    assert_eq!(written.tensors, sample_tensors());
    assert_eq!(
        written.metadata.get(keys::ARCHITECTURE),
        Some("stable-diffusion-v2-768-v")
    );
}

#[test]
fn merge_overrides_built_keys_and_keeps_the_rest() {
    let ws = Workspace::new();
    let input = ws.checkpoint(
        "input.safetensors",
        &metadata(&[
            ("modelspec.author", "A"),
            ("modelspec.license", "L"),
            ("ss_network_dim", "32"),
        ]),
    );

    let catalog = Catalog::default();
    let params = MetadataParams {
        author: Some("B".into()),
        ..MetadataParams::default()
    };
    let tagged = compute_metadata(&request(&input, params, false), &builder(&catalog)).unwrap();

    assert_eq!(tagged.metadata.get("modelspec.author"), Some("B"));
    assert_eq!(tagged.metadata.get("modelspec.license"), Some("L"));
    assert_eq!(tagged.metadata.get("ss_network_dim"), Some("32"));
}

#[test]
fn preview_does_not_create_output() {
    let ws = Workspace::new();
    let input = ws.checkpoint("input.safetensors", &Metadata::new());
    let output = ws.path("never-written.safetensors");

    let catalog = Catalog::default();
    compute_metadata(
        &request(&input, MetadataParams::default(), true),
        &builder(&catalog),
    )
    .unwrap();
    assert!(!output.exists());
}

#[test]
fn only_modelspec_filter() {
    let ws = Workspace::new();
    let path = ws.checkpoint(
        "model.safetensors",
        &metadata(&[("format", "pt"), ("modelspec.title", "T")]),
    );
    assert_eq!(inspect(&path, false).unwrap().len(), 2);
    assert_eq!(
        inspect(&path, true).unwrap(),
        metadata(&[("modelspec.title", "T")])
    );
}

#[test]
fn other_extensions_read_as_empty() {
    let ws = Workspace::new();
    let path = ws.checkpoint("model.pt", &metadata(&[("modelspec.title", "T")]));
    assert!(inspect(&path, false).unwrap().is_empty());
    assert!(!has_metadata(&path).unwrap());

    let catalog = Catalog::default();
    let tagged = compute_metadata(
        &request(&path, MetadataParams::default(), false),
        &builder(&catalog),
    )
    .unwrap();
    assert_eq!(tagged.metadata.get(keys::TITLE), Some("Checkpoint"));
}

#[test]
fn export_json_and_toml() {
    let ws = Workspace::new();
    let md = metadata(&[
        ("modelspec.title", "Export"),
        ("modelspec.description", "line one\nline \"two\""),
    ]);
    let model = ws.checkpoint("exported.safetensors", &md);
    let read = inspect(&model, false).unwrap();

    for format in [ExportFormat::Json, ExportFormat::Toml] {
        let path = export_path(ws.dir.path(), &model, format);
        export_metadata(&read, format, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Metadata = match format {
            ExportFormat::Json => serde_json::from_str(&text).unwrap(),
            ExportFormat::Toml => toml::from_str(&text).unwrap(),
        };
        assert_eq!(parsed, md, "{} export", format);
    }
    assert!(ws.path("exported.json").exists());
    assert!(ws.path("exported.toml").exists());
}

#[test]
fn thumbnail_round_trip() {
    let ws = Workspace::new();
    let input = ws.checkpoint("input.safetensors", &Metadata::new());
    let png = ws.png("thumb.png");
    let output = ws.path("with-thumb.safetensors");

    let catalog = Catalog::default();
    let params = MetadataParams {
        thumbnail: Some(png.clone()),
        ..MetadataParams::default()
    };
    let tagged = compute_metadata(&request(&input, params, false), &builder(&catalog)).unwrap();
    persist(&tagged, &output).unwrap();

    let read = inspect(&output, true).unwrap();
    let uri = read.get(keys::THUMBNAIL).unwrap();
    assert!(uri.starts_with("data:image/jpeg;base64,"));

    let saved = save_thumbnail(uri, &ws.path("with-thumb")).unwrap();
    assert_eq!(saved, ws.path("with-thumb.jpeg"));
    let expected = JpegCodec::default().encode_jpeg(&png).unwrap();
    assert_eq!(std::fs::read(&saved).unwrap(), expected);
    assert_eq!(decode_data_uri(uri).unwrap().bytes, expected);
}

#[test]
fn missing_checkpoint_is_io_error() {
    let ws = Workspace::new();
    let catalog = Catalog::default();
    let err = compute_metadata(
        &request(&ws.path("absent.safetensors"), MetadataParams::default(), false),
        &builder(&catalog),
    )
    .unwrap_err();
    assert!(matches!(err, modelspec::Error::Io { .. }));
}
