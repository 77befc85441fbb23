//! Content loaders for reading rule catalogs, scenarios and engine tables.
//!
//! Catalogs and scenarios are JSON or RON, picked by file extension; engine
//! tables are TOML.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod scenario;

pub use catalog::{CatalogLoader, RuleCatalog};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenario::{LoadedScenario, Scenario, ScenarioLoader};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::ContentError;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Data file encodings accepted for catalogs and scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            _ => Err(ContentError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> LoadResult<T> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Ron => ron::from_str(content)?,
        })
    }
}

/// Reads `path` and decodes it according to its extension.
pub(crate) fn read_data<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let format = Format::from_path(path)?;
    let content = read_file(path)?;
    format
        .parse(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} {}: {}", what, path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("a/rules.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("rules.RON")).unwrap(), Format::Ron);
        assert!(Format::from_path(Path::new("rules.yaml")).is_err());
        assert!(Format::from_path(Path::new("rules")).is_err());
    }
}
