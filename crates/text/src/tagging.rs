use crate::cooccurrence::CooccurrenceMap;
use serde::{Deserialize, Serialize};

/// Token annotated by an external part-of-speech tagger / dependency parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    /// Universal POS tag, e.g. "NOUN", "ADJ", "VERB"
    pub pos: String,
    /// Dependency role, e.g. "nsubj", "ROOT"
    pub dep: String,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: impl Into<String>, dep: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: pos.into(),
            dep: dep.into(),
        }
    }
}

pub trait Tagger: Send + Sync {
    fn tag(&self, sentence: &str) -> Vec<TaggedToken>;
}

/// Token classes that may take part in a subject chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainClass {
    /// Nouns and (passive) nominal subjects
    Noun,
    Adjective,
    /// Verbs and the sentence root
    Verb,
}

fn classify(token: &TaggedToken, enabled: &[ChainClass]) -> bool {
    let is_subject = matches!(token.dep.as_str(), "nsubj" | "nsubjpass");
    (enabled.contains(&ChainClass::Noun) && (token.pos == "NOUN" || is_subject))
        || (enabled.contains(&ChainClass::Adjective) && token.pos == "ADJ")
        || (enabled.contains(&ChainClass::Verb) && (token.pos == "VERB" || token.dep == "ROOT"))
}

/// Link consecutive subject-like tokens inside each sentence.
///
/// Each adjacent pair adds 1.0; chains never cross sentence boundaries.
pub fn subject_chain_links(
    sentences: &[String],
    tagger: &dyn Tagger,
    enabled: &[ChainClass],
) -> CooccurrenceMap {
    let mut links = CooccurrenceMap::new();

    for sentence in sentences {
        let subjects: Vec<String> = tagger
            .tag(sentence)
            .into_iter()
            .filter(|token| classify(token, enabled))
            .map(|token| token.text.to_lowercase())
            .collect();

        for pair in subjects.windows(2) {
            links.add_pair(&pair[0], &pair[1], 1.0);
        }
    }

    log::debug!(
        "Subject chains over {} sentences produced {} links",
        sentences.len(),
        links.len()
    );
    links
}
