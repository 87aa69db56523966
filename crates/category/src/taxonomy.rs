use crate::distance::levenshtein;
use crate::error::Result;
use mindmap_text::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One sense returned by a taxonomy: a label and one category for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyCandidate {
    pub label: String,
    pub category: String,
}

impl TaxonomyCandidate {
    pub fn new(label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
        }
    }
}

/// Result of asking a taxonomy about a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Candidate senses, in the service's order
    Found(Vec<TaxonomyCandidate>),
    /// The service knows nothing about the word
    NotFound,
    /// The service failed or was unavailable
    ServiceError(String),
}

/// External lexical taxonomy (WordNet, BabelNet, ...)
pub trait Taxonomy: Send + Sync {
    fn lookup(&self, word: &str, language: Language) -> LookupOutcome;
}

impl<T: Taxonomy + ?Sized> Taxonomy for Box<T> {
    fn lookup(&self, word: &str, language: Language) -> LookupOutcome {
        (**self).lookup(word, language)
    }
}

impl<T: Taxonomy + ?Sized> Taxonomy for std::sync::Arc<T> {
    fn lookup(&self, word: &str, language: Language) -> LookupOutcome {
        (**self).lookup(word, language)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Categories {
    One(String),
    Many(Vec<String>),
}

impl Categories {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(category) => vec![category],
            Self::Many(categories) => categories,
        }
    }
}

/// Fixed label → categories table with fuzzy candidate retrieval.
///
/// File format: `{"en": {"cat": "animal", "bank": ["institution", "land"]}, "de": {...}}`.
/// A lookup returns every label within `max_distance` edits of the word.
#[derive(Debug, Clone, Default)]
pub struct StaticTaxonomy {
    entries: HashMap<Language, Vec<(String, String)>>,
    max_distance: usize,
}

impl StaticTaxonomy {
    pub fn new(max_distance: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_distance,
        }
    }

    pub fn with_entry(
        mut self,
        language: Language,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.insert(language, label, category);
        self
    }

    pub fn insert(
        &mut self,
        language: Language,
        label: impl Into<String>,
        category: impl Into<String>,
    ) {
        self.entries
            .entry(language)
            .or_default()
            .push((label.into().to_lowercase(), category.into().to_lowercase()));
    }

    pub fn from_json_str(json: &str, max_distance: usize) -> Result<Self> {
        let raw: BTreeMap<Language, BTreeMap<String, Categories>> = serde_json::from_str(json)?;
        let mut taxonomy = Self::new(max_distance);
        for (language, labels) in raw {
            for (label, categories) in labels {
                for category in categories.into_vec() {
                    taxonomy.insert(language, label.as_str(), category);
                }
            }
        }
        Ok(taxonomy)
    }

    pub fn from_json_file(path: impl AsRef<Path>, max_distance: usize) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_json_str(&json, max_distance)?;
        log::info!(
            "Loaded static taxonomy with {} labels from {:?}",
            taxonomy.len(),
            path
        );
        Ok(taxonomy)
    }

    /// Number of (label, category) senses across all languages
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Taxonomy for StaticTaxonomy {
    fn lookup(&self, word: &str, language: Language) -> LookupOutcome {
        let Some(entries) = self.entries.get(&language) else {
            return LookupOutcome::NotFound;
        };

        let word = word.to_lowercase();
        let candidates: Vec<TaxonomyCandidate> = entries
            .iter()
            .filter(|(label, _)| levenshtein(&word, label) <= self.max_distance)
            .map(|(label, category)| TaxonomyCandidate::new(label.as_str(), category.as_str()))
            .collect();

        if candidates.is_empty() {
            LookupOutcome::NotFound
        } else {
            LookupOutcome::Found(candidates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_static_lookup_exact_and_fuzzy() {
        let taxonomy = StaticTaxonomy::new(1)
            .with_entry(Language::English, "cat", "animal")
            .with_entry(Language::English, "mat", "furniture")
            .with_entry(Language::English, "elephant", "animal");

        assert_eq!(
            taxonomy.lookup("Cat", Language::English),
            LookupOutcome::Found(vec![
                TaxonomyCandidate::new("cat", "animal"),
                TaxonomyCandidate::new("mat", "furniture"),
            ])
        );
        assert_eq!(
            taxonomy.lookup("zebra", Language::English),
            LookupOutcome::NotFound
        );
        assert_eq!(taxonomy.lookup("cat", Language::German), LookupOutcome::NotFound);
    }

    #[test]
    fn test_from_json() {
        let taxonomy = StaticTaxonomy::from_json_str(
            r#"{"en": {"bank": ["Institution", "land"], "cat": "animal"}, "de": {"katze": "tier"}}"#,
            0,
        )
        .unwrap();
        assert_eq!(taxonomy.len(), 4);
        assert_eq!(
            taxonomy.lookup("bank", Language::English),
            LookupOutcome::Found(vec![
                TaxonomyCandidate::new("bank", "institution"),
                TaxonomyCandidate::new("bank", "land"),
            ])
        );
        assert_eq!(
            taxonomy.lookup("katze", Language::German),
            LookupOutcome::Found(vec![TaxonomyCandidate::new("katze", "tier")])
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_language() {
        assert!(StaticTaxonomy::from_json_str(r#"{"fr": {"chat": "animal"}}"#, 0).is_err());
    }
}
