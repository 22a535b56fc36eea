//! Clap command tree definition.
//!
//! Builds the full `clap::Command` tree for the `modelspec` binary.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("modelspec")
        .about("Tag model checkpoints with Model Spec metadata and read it back")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Catalog file (default: ./modelspec.toml if present, else built-in tables)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Debug logging (overridden by RUST_LOG)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_tag())
        .subcommand(build_inspect())
        .subcommand(build_init_config())
}

// =========================================================================
// Tag
// =========================================================================

fn build_tag() -> Command {
    Command::new("tag")
        .about("Write Model Spec metadata into a checkpoint")
        .arg(
            Arg::new("ckpt")
                .long("ckpt")
                .required(true)
                .help("Path to the checkpoint file"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .default_value("model.safetensors")
                .help("Output file location"),
        )
        .arg(
            Arg::new("architecture")
                .long("architecture")
                .help("Architecture catalog key (default: sd_v1)"),
        )
        .arg(
            Arg::new("adapter")
                .long("adapter")
                .help("Adapter catalog key, e.g. lora"),
        )
        .arg(
            Arg::new("implementation")
                .long("implementation")
                .help("Implementation catalog key (default: stability_ai, or diffusers with --not-native)"),
        )
        .arg(
            Arg::new("not-native")
                .long("not-native")
                .help("The checkpoint is not in the native format")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("title").long("title").help("Title of the model"))
        .arg(
            Arg::new("description")
                .long("description")
                .help("Description of the model"),
        )
        .arg(Arg::new("author").long("author").help("Author of the model"))
        .arg(Arg::new("license").long("license").help("License for the model"))
        .arg(Arg::new("tags").long("tags").help("Tags for the model"))
        .arg(
            Arg::new("usage-hint")
                .long("usage-hint")
                .help("Usage hint for the model"),
        )
        .arg(
            Arg::new("trigger-phrase")
                .long("trigger-phrase")
                .help("Trigger phrases, separated by commas"),
        )
        .arg(
            Arg::new("thumbnail")
                .long("thumbnail")
                .help("Image to embed as the thumbnail"),
        )
        .arg(
            Arg::new("merged-from")
                .long("merged-from")
                .help("Models this one was merged from"),
        )
        .arg(
            Arg::new("prediction-type")
                .long("prediction-type")
                .help("Prediction type catalog key (default: epsilon)"),
        )
        .arg(
            Arg::new("reso")
                .long("reso")
                .help("Training resolution: '512' or '512,768'"),
        )
        .arg(
            Arg::new("timesteps")
                .long("timesteps")
                .help("Timestep range: '20' or '0,50'"),
        )
        .arg(
            Arg::new("clip-skip")
                .long("clip-skip")
                .help("Encoder layer (clip skip)")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("timestamp")
                .long("timestamp")
                .help("Epoch seconds or YYYY-MM-DD (default: now)"),
        )
        .arg(
            Arg::new("add-hash")
                .long("add-hash")
                .help("Add modelspec.hash_sha256 to the metadata")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the metadata without saving")
                .action(ArgAction::SetTrue),
        )
}

// =========================================================================
// Inspect
// =========================================================================

fn build_inspect() -> Command {
    Command::new("inspect")
        .about("Display metadata from a checkpoint")
        .arg(
            Arg::new("model")
                .long("model")
                .required(true)
                .help("Path to the model file"),
        )
        .arg(
            Arg::new("only-modelspec")
                .long("only-modelspec")
                .help("Only display modelspec.* keys")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-metadata")
                .long("save-metadata")
                .value_parser(["json", "toml"])
                .help("Also save the metadata as <model>.json or <model>.toml"),
        )
        .arg(
            Arg::new("save-thumbnail")
                .long("save-thumbnail")
                .help("Save the embedded thumbnail as <model>.<fmt>")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Recompute and check modelspec.hash_sha256")
                .action(ArgAction::SetTrue),
        )
}

// =========================================================================
// Init config
// =========================================================================

fn build_init_config() -> Command {
    Command::new("init-config")
        .about("Write the default catalog to ./modelspec.toml (or --config) if missing")
}
