use mindmap_category::{Categorizer, UNKNOWN_CATEGORY};
use mindmap_text::{CooccurrenceMap, Language, PairKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ranked, categorized relation between two words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalLink {
    pub source: String,
    pub target: String,
    pub source_category: String,
    pub target_category: String,
    pub weight: f64,
}

/// Post-processing applied to raw co-occurrence weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScale {
    /// Keep the accumulated counts
    Raw,
    /// Map `count / max_count` linearly onto `[min, max]`
    Normalized { min: f64, max: f64 },
}

impl WeightScale {
    /// `4.5 * count / max_count + 0.5`
    pub const fn normalized() -> Self {
        Self::Normalized { min: 0.5, max: 5.0 }
    }

    pub fn apply(&self, weight: f64, max_weight: f64) -> f64 {
        match *self {
            Self::Raw => weight,
            Self::Normalized { min, max } => {
                if max_weight > 0.0 {
                    min + (max - min) * (weight / max_weight)
                } else {
                    min
                }
            }
        }
    }
}

impl Default for WeightScale {
    fn default() -> Self {
        Self::Raw
    }
}

/// How co-occurrences become links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// Keep only the `top_k` heaviest pairs (None = keep all)
    pub top_k: Option<usize>,

    /// Skip category resolution (every category is `unknown`)
    pub live_mode: bool,

    pub weight_scale: WeightScale,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            live_mode: false,
            weight_scale: WeightScale::Raw,
        }
    }
}

impl RankOptions {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == Some(0) {
            return Err("top_k must be > 0 when set".to_string());
        }

        if let WeightScale::Normalized { min, max } = self.weight_scale {
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(format!(
                    "normalized weight range [{min}, {max}] must be finite with min <= max"
                ));
            }
        }

        Ok(())
    }
}

/// Turn co-occurrence weights into links, heaviest first.
///
/// Ties keep the order in which the pairs were first seen. Categories are only
/// resolved for links that survive truncation, once per distinct word; without a
/// categorizer, or in live mode, every category is `unknown`.
pub fn rank_links(
    cooccurrence: &CooccurrenceMap,
    options: &RankOptions,
    categorizer: Option<&dyn Categorizer>,
    language: Language,
) -> Vec<LogicalLink> {
    let mut ranked: Vec<(&PairKey, f64)> = cooccurrence.iter().collect();
    if ranked.is_empty() {
        return Vec::new();
    }

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let max_weight = ranked[0].1;
    if let Some(k) = options.top_k {
        ranked.truncate(k);
    }

    let categorizer = if options.live_mode { None } else { categorizer };
    let mut categories: HashMap<String, String> = HashMap::new();
    let mut category_of = |word: &str| -> String {
        let Some(categorizer) = categorizer else {
            return UNKNOWN_CATEGORY.to_string();
        };
        categories
            .entry(word.to_string())
            .or_insert_with(|| categorizer.category_of(word, language))
            .clone()
    };

    let links: Vec<LogicalLink> = ranked
        .into_iter()
        .map(|(key, weight)| LogicalLink {
            source: key.first().to_string(),
            target: key.second().to_string(),
            source_category: category_of(key.first()),
            target_category: category_of(key.second()),
            weight: options.weight_scale.apply(weight, max_weight),
        })
        .collect();

    log::debug!(
        "Ranked {} of {} co-occurring pairs (live_mode: {})",
        links.len(),
        cooccurrence.len(),
        options.live_mode
    );
    links
}
