//! ArgMatches → CliAction conversion.
//!
//! Translates clap's parsed arguments into typed workflow inputs:
//! - `tag` → `CliAction::Tag` with a ready [`TagRequest`]
//! - `inspect` → `CliAction::Inspect`
//! - `init-config` → `CliAction::InitConfig`

use std::path::PathBuf;

use clap::ArgMatches;
use modelspec_builder::{MetadataParams, Resolution, TimestampInput, TimestepRange};
use modelspec_core::Result;
use modelspec_editor::{ExportFormat, TagRequest};

/// The result of parsing the command line.
#[derive(Debug)]
pub enum CliAction {
    /// Tag a checkpoint.
    Tag(TagArgs),
    /// Read a checkpoint's metadata.
    Inspect(InspectArgs),
    /// Write the default catalog file.
    InitConfig,
}

/// Parsed `tag` arguments.
#[derive(Debug)]
pub struct TagArgs {
    pub request: TagRequest,
    pub output: PathBuf,
    pub dry_run: bool,
}

/// Parsed `inspect` arguments.
#[derive(Debug, PartialEq, Eq)]
pub struct InspectArgs {
    pub model: PathBuf,
    pub only_modelspec: bool,
    pub save_metadata: Option<ExportFormat>,
    pub save_thumbnail: bool,
    pub verify: bool,
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction> {
    match matches.subcommand() {
        Some(("tag", sub)) => parse_tag(sub).map(CliAction::Tag),
        Some(("inspect", sub)) => parse_inspect(sub).map(CliAction::Inspect),
        Some(("init-config", _)) => Ok(CliAction::InitConfig),
        Some((other, _)) => Err(modelspec_core::Error::input(
            "command",
            format!("unknown command '{}'", other),
        )),
        None => Err(modelspec_core::Error::input("command", "no command provided")),
    }
}

fn string_arg(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn parse_tag(matches: &ArgMatches) -> Result<TagArgs> {
    let mut params = match string_arg(matches, "architecture") {
        Some(architecture) => MetadataParams::new(architecture),
        None => MetadataParams::default(),
    };
    params.adapter = string_arg(matches, "adapter");
    params.implementation = string_arg(matches, "implementation");
    params.native_checkpoint = !matches.get_flag("not-native");
    params.title = string_arg(matches, "title");
    params.author = string_arg(matches, "author");
    params.description = string_arg(matches, "description");
    params.license = string_arg(matches, "license");
    params.tags = string_arg(matches, "tags");
    params.merged_from = string_arg(matches, "merged-from");
    params.usage_hint = string_arg(matches, "usage-hint");
    params.trigger_phrase = string_arg(matches, "trigger-phrase");
    params.thumbnail = string_arg(matches, "thumbnail").map(PathBuf::from);
    params.timestamp = string_arg(matches, "timestamp").map(TimestampInput::Text);
    params.prediction_type = string_arg(matches, "prediction-type");
    params.encoder_layer = matches.get_one::<u32>("clip-skip").copied();
    params.resolution = string_arg(matches, "reso")
        .map(|s| s.parse::<Resolution>())
        .transpose()?;
    params.timestep_range = string_arg(matches, "timesteps")
        .map(|s| s.parse::<TimestepRange>())
        .transpose()?;

    let checkpoint = string_arg(matches, "ckpt")
        .map(PathBuf::from)
        .ok_or_else(|| modelspec_core::Error::input("ckpt", "missing checkpoint path"))?;
    let output = string_arg(matches, "output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("model.safetensors"));

    Ok(TagArgs {
        request: TagRequest {
            checkpoint,
            params,
            add_hash: matches.get_flag("add-hash"),
        },
        output,
        dry_run: matches.get_flag("dry-run"),
    })
}

fn parse_inspect(matches: &ArgMatches) -> Result<InspectArgs> {
    let model = string_arg(matches, "model")
        .map(PathBuf::from)
        .ok_or_else(|| modelspec_core::Error::input("model", "missing model path"))?;
    let save_metadata = string_arg(matches, "save-metadata")
        .map(|s| s.parse::<ExportFormat>())
        .transpose()?;
    Ok(InspectArgs {
        model,
        only_modelspec: matches.get_flag("only-modelspec"),
        save_metadata,
        save_thumbnail: matches.get_flag("save-thumbnail"),
        verify: matches.get_flag("verify"),
    })
}
