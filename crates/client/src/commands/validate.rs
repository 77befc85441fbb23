//! `wargame validate`: structural checks over a data directory.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use wargame_content::{ScenarioLoader, validate_rules};

use super::ContentArgs;

/// Check the rule catalog and every scenario
#[derive(Parser)]
pub struct Validate {
    #[command(flatten)]
    content: ContentArgs,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let factory = self.content.factory();
        let config = factory.load_config()?;
        let catalog = factory.load_catalog()?;

        let issues = validate_rules(catalog.iter(), &config);
        for issue in &issues {
            println!("{} {}", style("✗").red(), issue);
        }

        let mut broken = 0;
        let dir = factory.data_dir().join("scenarios");
        if dir.is_dir() {
            let entries = fs::read_dir(&dir)
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            for entry in entries {
                let path = entry?.path();
                match ScenarioLoader::load_with(&path, &catalog) {
                    Ok(loaded) => {
                        if let Err(e) = loaded.engagement() {
                            broken += 1;
                            println!("{} {}: {}", style("✗").red(), path.display(), e);
                        }
                    }
                    Err(e) => {
                        broken += 1;
                        println!("{} {}: {:#}", style("✗").red(), path.display(), e);
                    }
                }
            }
        }

        if !issues.is_empty() || broken > 0 {
            anyhow::bail!(
                "{} rule issue(s), {} broken scenario(s)",
                issues.len(),
                broken
            );
        }
        println!(
            "{} {} rules ok",
            style("✓").green(),
            catalog.len()
        );
        Ok(())
    }
}
