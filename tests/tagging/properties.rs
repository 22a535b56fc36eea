//! Generated mappings through the full write/read path.

use crate::common::*;
use modelspec::{compute_metadata, inspect, persist, verify, HashCheck};
use proptest::prelude::*;

fn params_strategy() -> impl Strategy<Value = MetadataParams> {
    (
        prop::option::of("\\PC{0,24}"),
        prop::option::of("\\PC{0,24}"),
        prop::option::of("[a-z ,]{0,24}"),
        prop::option::of((1u32..4096, 1u32..4096)),
        prop::option::of(0u32..12),
    )
        .prop_map(|(title, author, tags, reso, layer)| MetadataParams {
            title,
            author,
            tags,
            resolution: reso.map(Into::into),
            encoder_layer: layer,
            ..MetadataParams::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tagged_metadata_survives_persist_and_inspect(
        params in params_strategy(),
        foreign in "[a-z_]{1,12}",
        foreign_value in "\\PC{0,24}",
    ) {
        let ws = Workspace::new();
        let existing = metadata(&[(foreign.as_str(), foreign_value.as_str())]);
        let input = ws.checkpoint("input.safetensors", &existing);
        let output = ws.path("output.safetensors");

        let catalog = Catalog::default();
        let tagged = compute_metadata(&request(&input, params, true), &builder(&catalog)).unwrap();
        persist(&tagged, &output).unwrap();

        let read = inspect(&output, false).unwrap();
        prop_assert_eq!(&read, &tagged.metadata);
        prop_assert_eq!(read.get(&foreign), Some(foreign_value.as_str()));
        prop_assert_eq!(verify(&output).unwrap(), HashCheck::Match);
        prop_assert_eq!(modelspec::load(&output).unwrap().tensors, sample_tensors());
    }
}
