//! Name catalogs via `modelspec.toml`
//!
//! The closed sets of architectures, adapters, implementations and
//! prediction types are configuration, not code. Each table maps the short
//! key a user passes (e.g. `sd_v1`) to the value written into the metadata
//! (e.g. `stable-diffusion-v1`). `Catalog::default()` carries the standard
//! Model Spec tables; a `modelspec.toml` file replaces them wholesale per
//! table.

use modelspec_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Config file name looked up next to the working directory.
pub const CONFIG_FILE_NAME: &str = "modelspec.toml";

/// Architecture used when the caller does not pick one.
pub const DEFAULT_ARCHITECTURE: &str = "sd_v1";
/// Implementation for native-format checkpoints.
pub const DEFAULT_IMPLEMENTATION: &str = "stability_ai";
/// Implementation for checkpoints that are not in the native format.
pub const FALLBACK_IMPLEMENTATION: &str = "diffusers";
/// Prediction type used when the caller does not pick one.
pub const DEFAULT_PREDICTION_TYPE: &str = "epsilon";

/// Lookup tables for the closed-set metadata fields.
///
/// # Example
///
/// ```toml
/// [architectures]
/// sd_v1 = "stable-diffusion-v1"
///
/// [adapters]
/// lora = "lora"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Architecture key → architecture name
    #[serde(default = "default_architectures")]
    pub architectures: BTreeMap<String, String>,
    /// Adapter key → adapter name
    #[serde(default = "default_adapters")]
    pub adapters: BTreeMap<String, String>,
    /// Implementation key → implementation reference
    #[serde(default = "default_implementations")]
    pub implementations: BTreeMap<String, String>,
    /// Prediction type key → prediction type name
    #[serde(default = "default_prediction_types")]
    pub prediction_types: BTreeMap<String, String>,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_architectures() -> BTreeMap<String, String> {
    table(&[
        ("sd_v1", "stable-diffusion-v1"),
        ("sd_v2_512", "stable-diffusion-v2-512"),
        ("sd_v2_768_v", "stable-diffusion-v2-768-v"),
        ("sd_xl_v1_base", "stable-diffusion-xl-v1-base"),
    ])
}

fn default_adapters() -> BTreeMap<String, String> {
    table(&[("lora", "lora"), ("textual_inversion", "textual-inversion")])
}

fn default_implementations() -> BTreeMap<String, String> {
    table(&[
        (
            DEFAULT_IMPLEMENTATION,
            "https://github.com/Stability-AI/generative-models",
        ),
        (FALLBACK_IMPLEMENTATION, "diffusers"),
    ])
}

fn default_prediction_types() -> BTreeMap<String, String> {
    table(&[(DEFAULT_PREDICTION_TYPE, "epsilon"), ("v", "v")])
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            architectures: default_architectures(),
            adapters: default_adapters(),
            implementations: default_implementations(),
            prediction_types: default_prediction_types(),
        }
    }
}

impl Catalog {
    /// Resolve an architecture key.
    pub fn architecture(&self, key: &str) -> Result<&str> {
        lookup("architecture", &self.architectures, key)
    }

    /// Resolve an adapter key.
    pub fn adapter(&self, key: &str) -> Result<&str> {
        lookup("adapter", &self.adapters, key)
    }

    /// Resolve an implementation key.
    pub fn implementation(&self, key: &str) -> Result<&str> {
        lookup("implementation", &self.implementations, key)
    }

    /// Resolve a prediction type key.
    pub fn prediction_type(&self, key: &str) -> Result<&str> {
        lookup("prediction_type", &self.prediction_types, key)
    }

    /// Check that every default key the builder may fall back to exists.
    ///
    /// # Errors
    ///
    /// Returns an input error naming the table and the missing key.
    pub fn validate(&self) -> Result<()> {
        self.implementation(DEFAULT_IMPLEMENTATION)?;
        self.implementation(FALLBACK_IMPLEMENTATION)?;
        self.prediction_type(DEFAULT_PREDICTION_TYPE)?;
        if self.architectures.is_empty() {
            return Err(Error::input("architecture", "catalog has no architectures"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Model Spec catalog
#
# Each table maps the key accepted on the command line to the value
# written into the checkpoint metadata. A table present here replaces
# the built-in table of the same name entirely.

[architectures]
sd_v1 = "stable-diffusion-v1"
sd_v2_512 = "stable-diffusion-v2-512"
sd_v2_768_v = "stable-diffusion-v2-768-v"
sd_xl_v1_base = "stable-diffusion-xl-v1-base"

[adapters]
lora = "lora"
textual_inversion = "textual-inversion"

# "stability_ai" and "diffusers" must stay: they are the defaults for
# native and non-native checkpoints.
[implementations]
stability_ai = "https://github.com/Stability-AI/generative-models"
diffusers = "diffusers"

# "epsilon" must stay: it is the default prediction type.
[prediction_types]
epsilon = "epsilon"
v = "v"
"#
    }

    /// Parse a catalog from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)
            .map_err(|e| Error::input("config", format!("Failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read and parse a catalog from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Input { field, reason } => Error::Input {
                field,
                reason: format!("{} (in '{}')", reason, path.display()),
            },
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::io(path, e))?;
        }
        Ok(())
    }
}

fn lookup<'a>(field: &str, table: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    table.get(key).map(String::as_str).ok_or_else(|| {
        let choices: Vec<&str> = table.keys().map(String::as_str).collect();
        Error::input(
            field,
            format!("unknown value '{}', expected one of: {}", key, choices.join(", ")),
        )
    })
}
