//! Engine table loader.

use std::path::Path;

use anyhow::Context;
use wargame_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine tables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`EngineConfig`] from a TOML file. Missing keys keep their
    /// standard values.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        anyhow::ensure!(
            (2..=EngineConfig::MAX_DIE_SIDES).contains(&config.die_sides),
            "die_sides {} is outside 2..={}",
            config.die_sides,
            EngineConfig::MAX_DIE_SIDES
        );
        anyhow::ensure!(
            (EngineConfig::LOWEST_MIN_THRESHOLD..=config.die_sides).contains(&config.min_threshold),
            "min_threshold {} must lie in {}..={} for a d{}",
            config.min_threshold,
            EngineConfig::LOWEST_MIN_THRESHOLD,
            config.die_sides,
            config.die_sides
        );
        anyhow::ensure!(config.blast_divisor > 0, "blast_divisor must be positive");
        Ok(config)
    }
}
