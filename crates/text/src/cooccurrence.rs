use crate::config::{PairCounting, TextConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Unordered pair of distinct words; `{a, b} == {b, a}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Canonical key for a pair, `None` for a self-pair
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, word: &str) -> bool {
        self.first == word || self.second == word
    }

    /// The other member of the pair, if `word` is a member
    pub fn other(&self, word: &str) -> Option<&str> {
        if self.first == word {
            Some(&self.second)
        } else if self.second == word {
            Some(&self.first)
        } else {
            None
        }
    }

    pub fn into_parts(self) -> (String, String) {
        (self.first, self.second)
    }
}

/// Pair → accumulated weight, remembering the order in which pairs were first seen
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceMap {
    entries: Vec<(PairKey, f64)>,
    index: HashMap<PairKey, usize>,
}

impl CooccurrenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the pair's total
    pub fn add(&mut self, key: PairKey, weight: f64) {
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1 += weight,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, weight));
            }
        }
    }

    /// Add `weight` for words `a` and `b`; returns false for a self-pair
    pub fn add_pair(&mut self, a: &str, b: &str, weight: f64) -> bool {
        match PairKey::new(a, b) {
            Some(key) => {
                self.add(key, weight);
                true
            }
            None => false,
        }
    }

    pub fn weight(&self, key: &PairKey) -> Option<f64> {
        self.index.get(key).map(|&idx| self.entries[idx].1)
    }

    /// Weight for `a` and `b` in either order
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        PairKey::new(a, b).and_then(|key| self.weight(&key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, f64)> {
        self.entries.iter().map(|(key, weight)| (key, *weight))
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.entries.iter().map(|(_, w)| *w).reduce(f64::max)
    }

    /// Sum another map into this one; new pairs keep the other map's order
    pub fn merge(&mut self, other: CooccurrenceMap) {
        for (key, weight) in other.entries {
            self.add(key, weight);
        }
    }

    pub fn into_entries(self) -> Vec<(PairKey, f64)> {
        self.entries
    }
}

impl FromIterator<(PairKey, f64)> for CooccurrenceMap {
    fn from_iter<I: IntoIterator<Item = (PairKey, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, weight) in iter {
            map.add(key, weight);
        }
        map
    }
}

/// Interned token sequence shared read-only by all workers of one job
pub(crate) struct Vocabulary<'a> {
    words: Vec<&'a str>,
    short: Vec<bool>,
}

impl<'a> Vocabulary<'a> {
    /// Intern `tokens`, returning the vocabulary and the id sequence
    pub(crate) fn intern(tokens: &'a [String], config: &TextConfig) -> (Self, Vec<u32>) {
        let mut ids_by_word: HashMap<&'a str, u32> = HashMap::new();
        let mut words = Vec::new();
        let mut short = Vec::new();
        let mut ids = Vec::with_capacity(tokens.len());

        for token in tokens {
            let id = *ids_by_word.entry(token.as_str()).or_insert_with(|| {
                words.push(token.as_str());
                short.push(config.is_short_word(token));
                #[allow(clippy::cast_possible_truncation)]
                let id = (words.len() - 1) as u32;
                id
            });
            ids.push(id);
        }

        (Self { words, short }, ids)
    }

    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    fn increment(&self, a: u32, b: u32, config: &TextConfig) -> f64 {
        config.increment_for(self.short[a as usize], self.short[b as usize])
    }
}

/// Partial counts of one worker, keyed by interned ids
#[derive(Debug, Default)]
pub(crate) struct PartialCounts {
    entries: Vec<((u32, u32), f64)>,
    index: HashMap<(u32, u32), usize>,
}

impl PartialCounts {
    fn add(&mut self, a: u32, b: u32, weight: f64) {
        if a == b {
            return;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1 += weight,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, weight));
            }
        }
    }

    pub(crate) fn merge(&mut self, other: PartialCounts) {
        for ((a, b), weight) in other.entries {
            self.add(a, b, weight);
        }
    }

    pub(crate) fn into_map(self, vocab: &Vocabulary<'_>) -> CooccurrenceMap {
        let mut map = CooccurrenceMap::new();
        for ((a, b), weight) in self.entries {
            map.add_pair(vocab.words[a as usize], vocab.words[b as usize], weight);
        }
        map
    }
}

/// Count pairs anchored at positions in `anchors`, reading the whole of `ids`
pub(crate) fn count_ids(
    ids: &[u32],
    anchors: Range<usize>,
    vocab: &Vocabulary<'_>,
    config: &TextConfig,
) -> PartialCounts {
    let mut counts = PartialCounts::default();
    let n = ids.len();
    if n == 0 {
        return counts;
    }
    let w = config.window_size;
    let anchors = anchors.start.min(n)..anchors.end.min(n);

    match config.pair_counting {
        PairCounting::Pairwise => {
            for i in anchors {
                let hi = i.saturating_add(w).min(n - 1);
                for j in i + 1..=hi {
                    let weight = vocab.increment(ids[i], ids[j], config);
                    counts.add(ids[i], ids[j], weight);
                }
            }
        }
        PairCounting::SlidingWindow => {
            for center in anchors {
                let lo = center.saturating_sub(w);
                let hi = center.saturating_add(w).min(n - 1);
                for p in lo..=hi {
                    for q in p + 1..=hi {
                        let weight = vocab.increment(ids[p], ids[q], config);
                        counts.add(ids[p], ids[q], weight);
                    }
                }
            }
        }
    }

    counts
}

/// Single-threaded co-occurrence count over the whole sequence
pub fn count_cooccurrence(tokens: &[String], config: &TextConfig) -> CooccurrenceMap {
    let (vocab, ids) = Vocabulary::intern(tokens, config);
    count_ids(&ids, 0..ids.len(), &vocab, config).into_map(&vocab)
}
