//! Model Spec CLI: tag checkpoints and read their metadata back.
//!
//! - `modelspec tag --ckpt in.safetensors --output out.safetensors [fields]`
//! - `modelspec inspect --model out.safetensors [--save-metadata json]`
//! - `modelspec init-config` writes the default catalog

mod commands;
mod format;
mod parse;

use std::path::{Path, PathBuf};
use std::process;

use modelspec_builder::{Catalog, MetadataBuilder, CONFIG_FILE_NAME};
use modelspec_core::{keys, Result};
use modelspec_editor::{
    compute_metadata, export_metadata, export_path, inspect, model_name, persist,
    save_thumbnail, verify,
};
use tracing::{debug, info};

use commands::build_cli;
use format::{format_error, format_hash_check, format_metadata, OutputMode};
use parse::{matches_to_action, CliAction, InspectArgs, TagArgs};

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_flag("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = matches.get_one::<String>("config").map(PathBuf::from);

    let result = matches_to_action(&matches).and_then(|action| match action {
        CliAction::Tag(args) => run_tag(args, config.as_deref(), mode),
        CliAction::Inspect(args) => run_inspect(args, mode),
        CliAction::InitConfig => run_init_config(config.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("{}", format_error(&e, mode));
        process::exit(1);
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config`, else `./modelspec.toml` if present, else built-in tables.
fn load_catalog(config: Option<&Path>) -> Result<Catalog> {
    match config {
        Some(path) => {
            debug!(path = %path.display(), "Loading catalog");
            Catalog::from_file(path)
        }
        None => {
            let local = Path::new(CONFIG_FILE_NAME);
            if local.is_file() {
                debug!(path = %local.display(), "Loading catalog");
                Catalog::from_file(local)
            } else {
                Ok(Catalog::default())
            }
        }
    }
}

fn run_tag(args: TagArgs, config: Option<&Path>, mode: OutputMode) -> Result<()> {
    let catalog = load_catalog(config)?;
    let builder = MetadataBuilder::new(&catalog);

    let tagged = compute_metadata(&args.request, &builder)?;
    info!(keys = tagged.metadata.len(), "Metadata built");

    if args.dry_run {
        info!("Dry run, not saving");
        println!("{}", format_metadata(&tagged.metadata, OutputMode::Json));
        return Ok(());
    }

    persist(&tagged, &args.output)?;
    if mode == OutputMode::Json {
        println!("{}", format_metadata(&tagged.metadata, mode));
    }
    Ok(())
}

fn run_inspect(args: InspectArgs, mode: OutputMode) -> Result<()> {
    let metadata = inspect(&args.model, args.only_modelspec)?;
    println!("{}", format_metadata(&metadata, mode));

    let name = model_name(&args.model);

    if let Some(format) = args.save_metadata {
        let path = export_path(Path::new("."), &args.model, format);
        export_metadata(&metadata, format, &path)?;
        eprintln!("Metadata saved to: {}", path.display());
    }

    if args.save_thumbnail {
        match metadata.get(keys::THUMBNAIL) {
            Some(uri) => {
                let path = save_thumbnail(uri, Path::new(&name))?;
                eprintln!("Thumbnail saved as: {}", path.display());
            }
            None => info!("No thumbnail in metadata"),
        }
    }

    if args.verify {
        let check = verify(&args.model)?;
        println!("{}", format_hash_check(&check, mode));
    }
    Ok(())
}

fn run_init_config(config: Option<&Path>) -> Result<()> {
    let path = config.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));
    if path.exists() {
        eprintln!("Catalog already exists at {}", path.display());
    } else {
        Catalog::write_default_if_missing(path)?;
        eprintln!("Default catalog written to {}", path.display());
    }
    Ok(())
}
