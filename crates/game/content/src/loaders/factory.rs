//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use wargame_core::EngineConfig;

use crate::loaders::{
    CatalogLoader, ConfigLoader, LoadResult, LoadedScenario, RuleCatalog, ScenarioLoader,
};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml        (optional)
/// ├── rules.json
/// └── scenarios/
///     ├── intercessors_vs_marines.json
///     └── ...
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine tables from `config.toml`, or the standard tables when the
    /// file is absent.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the rule catalog from `rules.json` (or `rules.ron`).
    pub fn load_catalog(&self) -> LoadResult<RuleCatalog> {
        let json = self.data_dir.join("rules.json");
        let path = if json.exists() {
            json
        } else {
            self.data_dir.join("rules.ron")
        };
        CatalogLoader::load(&path)
    }

    /// Load `scenarios/{name}.json` (or `.ron`) with its rules resolved.
    pub fn load_scenario(&self, name: &str, catalog: &RuleCatalog) -> LoadResult<LoadedScenario> {
        ScenarioLoader::load_with(&self.scenario_path(name), catalog)
    }

    pub fn scenario_path(&self, name: &str) -> PathBuf {
        let dir = self.data_dir.join("scenarios");
        let json = dir.join(format!("{name}.json"));
        if json.exists() {
            json
        } else {
            dir.join(format!("{name}.ron"))
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
