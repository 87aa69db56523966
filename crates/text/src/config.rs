use serde::{Deserialize, Serialize};

/// Configuration for co-occurrence counting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Maximum token distance considered around each position
    pub window_size: usize,

    /// Words shorter than this many characters are down-weighted
    pub short_word_len: usize,

    /// Increment used for a pair when either word is short
    pub short_word_weight: f64,

    /// Which position pairs are counted
    pub pair_counting: PairCounting,

    /// How the token sequence is split across workers
    pub sharding: ShardStrategy,

    /// Tokens a single worker should handle before another shard is added
    pub tokens_per_worker: usize,

    /// Upper bound for the worker pool (None = hardware concurrency)
    pub max_workers: Option<usize>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            short_word_len: 4,
            short_word_weight: 0.2,
            pair_counting: PairCounting::SlidingWindow,
            sharding: ShardStrategy::Contiguous,
            tokens_per_worker: 400,
            max_workers: None,
        }
    }
}

impl TextConfig {
    /// Sliding windows over strided shards; counts every pair once per covering window
    pub fn sliding_strided() -> Self {
        Self {
            pair_counting: PairCounting::SlidingWindow,
            sharding: ShardStrategy::Strided,
            ..Default::default()
        }
    }

    /// Each position pair within `window_size` counted exactly once
    pub fn pairwise() -> Self {
        Self {
            pair_counting: PairCounting::Pairwise,
            ..Default::default()
        }
    }

    /// Whether `word` is short enough to be down-weighted (length in characters)
    pub fn is_short_word(&self, word: &str) -> bool {
        word.chars().count() < self.short_word_len
    }

    /// Weight contributed by one co-occurrence of `a` and `b`
    pub fn increment(&self, a: &str, b: &str) -> f64 {
        self.increment_for(self.is_short_word(a), self.is_short_word(b))
    }

    pub(crate) fn increment_for(&self, a_short: bool, b_short: bool) -> f64 {
        if a_short || b_short {
            self.short_word_weight
        } else {
            1.0
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window_size == 0 {
            return Err("window_size must be > 0".to_string());
        }

        if !(self.short_word_weight.is_finite() && self.short_word_weight >= 0.0) {
            return Err(format!(
                "short_word_weight ({}) must be a finite, non-negative number",
                self.short_word_weight
            ));
        }

        if self.tokens_per_worker == 0 {
            return Err("tokens_per_worker must be > 0".to_string());
        }

        if self.max_workers == Some(0) {
            return Err("max_workers must be > 0 when set".to_string());
        }

        Ok(())
    }
}

/// Rule deciding which position pairs contribute to a pair's weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCounting {
    /// Every position pair at distance 1..=window contributes exactly once
    Pairwise,

    /// Every pair inside each centered window [i-w, i+w] contributes once per window.
    /// Pairs up to 2w apart are counted; close pairs are counted by many windows.
    #[default]
    SlidingWindow,
}

/// Strategy for splitting the token sequence across workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShardStrategy {
    /// Contiguous anchor ranges over the shared sequence; identical to a single-shard run
    Contiguous,

    /// Worker k sees tokens k, k+n, k+2n, ... as its own sequence.
    /// Faster on huge inputs but the result depends on the shard count.
    Strided,
}

impl Default for ShardStrategy {
    fn default() -> Self {
        Self::Contiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(TextConfig::default().validate().is_ok());
        assert!(TextConfig::sliding_strided().validate().is_ok());
        assert!(TextConfig::pairwise().validate().is_ok());
        assert_eq!(TextConfig::default().pair_counting, PairCounting::SlidingWindow);
    }

    #[test]
    fn test_config_validation() {
        let mut config = TextConfig::default();

        config.window_size = 0;
        assert!(config.validate().is_err());

        config.window_size = 3;
        config.short_word_weight = f64::NAN;
        assert!(config.validate().is_err());

        config.short_word_weight = 0.2;
        config.tokens_per_worker = 0;
        assert!(config.validate().is_err());

        config.tokens_per_worker = 10;
        config.max_workers = Some(0);
        assert!(config.validate().is_err());

        config.max_workers = Some(2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_word_increment() {
        let config = TextConfig::default();
        assert_eq!(config.increment("it", "understanding"), 0.2);
        assert_eq!(config.increment("understanding", "it"), 0.2);
        assert_eq!(config.increment("word", "understanding"), 1.0);
        // Length is measured in characters, not bytes
        assert_eq!(config.increment("über", "straße"), 1.0);
        assert!(config.is_short_word("ox"));
        assert!(!config.is_short_word("über"));
    }
}
