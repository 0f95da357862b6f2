//! Engine tuning with TOML preset support.
//!
//! Sampler tuning, coloring defaults and the graphics tier are consolidated
//! here. Options serialize to/from TOML so hosts can keep named presets on
//! disk.

mod cascade;
mod graphics;
mod sampler;

use std::path::Path;

pub use cascade::CascadeOptions;
pub use graphics::GraphicsOptions;
pub use sampler::SamplerOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MesoError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[graphics]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Distinct-color search tuning.
    pub sampler: SamplerOptions,
    /// Defaults for color scheme edits.
    pub cascade: CascadeOptions,
    /// Level-of-detail tier.
    pub graphics: GraphicsOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// A preset whose coloring defaults fall outside the accepted ranges is
    /// rejected with [`MesoError::MalformedColorSpec`].
    pub fn load(path: &Path) -> Result<Self, MesoError> {
        let content = std::fs::read_to_string(path).map_err(MesoError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| MesoError::OptionsParse(e.to_string()))?;
        options.cascade.to_spec().validate()?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// Coloring defaults are validated first so a saved preset always loads.
    pub fn save(&self, path: &Path) -> Result<(), MesoError> {
        self.cascade.to_spec().validate()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| MesoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MesoError::Io)?;
        }
        std::fs::write(path, content).map_err(MesoError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
