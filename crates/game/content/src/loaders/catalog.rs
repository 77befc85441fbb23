//! Rule catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use wargame_core::{Rule, RuleId};

use crate::ContentError;
use crate::loaders::{LoadResult, read_data};

/// Rules indexed by id, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    index: BTreeMap<RuleId, usize>,
}

impl RuleCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new(rules: Vec<Rule>) -> Result<Self, ContentError> {
        let mut index = BTreeMap::new();
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.id.clone(), i).is_some() {
                return Err(ContentError::DuplicateRule(rule.id.clone()));
            }
        }
        Ok(Self { rules, index })
    }

    pub fn get(&self, id: &RuleId) -> Option<&Rule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    /// Looks up every id, failing on the first unknown one.
    pub fn select<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i RuleId>,
    ) -> Result<Vec<Rule>, ContentError> {
        ids.into_iter()
            .map(|id| {
                self.get(id)
                    .cloned()
                    .ok_or_else(|| ContentError::UnknownRule(id.clone()))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    rules: Vec<Rule>,
}

/// Loader for rule catalogs from JSON or RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog of the form `{ "rules": [...] }`.
    pub fn load(path: &Path) -> LoadResult<RuleCatalog> {
        let file: CatalogFile = read_data(path, "rule catalog")?;
        let catalog = RuleCatalog::new(file.rules)?;
        tracing::debug!(path = %path.display(), rules = catalog.len(), "loaded rule catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = RuleCatalog::new(vec![
            Rule::reminder("a", "A", "first"),
            Rule::reminder("a", "A", "second"),
        ])
        .unwrap_err();
        assert_eq!(err, ContentError::DuplicateRule(RuleId::new("a")));
    }

    #[test]
    fn select_preserves_requested_order() {
        let catalog = RuleCatalog::new(vec![
            Rule::reminder("a", "A", "x"),
            Rule::reminder("b", "B", "y"),
        ])
        .unwrap();
        let ids = [RuleId::new("b"), RuleId::new("a")];
        let rules = catalog.select(&ids).unwrap();
        assert_eq!(rules[0].id.as_str(), "b");
        assert_eq!(rules[1].id.as_str(), "a");

        let missing = [RuleId::new("c")];
        assert_eq!(
            catalog.select(&missing).unwrap_err(),
            ContentError::UnknownRule(RuleId::new("c"))
        );
    }
}
