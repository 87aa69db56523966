use mindmap_text::{
    count_cooccurrence, CooccurrenceEngine, CooccurrenceMap, PairCounting, PairKey, ShardStrategy,
    TextConfig,
};
use proptest::prelude::*;
use std::collections::HashMap;

const VOCAB: &[&str] = &["cat", "mat", "ox", "river", "stone", "bank", "we"];

fn token_seq(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(VOCAB).prop_map(str::to_string),
        0..max_len,
    )
}

/// Reference enumeration of the rule selected by `config.pair_counting`
fn brute_force(tokens: &[String], config: &TextConfig) -> HashMap<PairKey, f64> {
    let mut expected = HashMap::new();
    let mut add = |i: usize, j: usize| {
        if let Some(key) = PairKey::new(&tokens[i], &tokens[j]) {
            *expected.entry(key).or_insert(0.0) += config.increment(&tokens[i], &tokens[j]);
        }
    };
    let w = config.window_size;
    match config.pair_counting {
        // every (i, j) with 0 < j - i <= w
        PairCounting::Pairwise => {
            for i in 0..tokens.len() {
                for j in i + 1..tokens.len().min(i + w + 1) {
                    add(i, j);
                }
            }
        }
        // every pair inside [c - w, c + w], once per center c
        PairCounting::SlidingWindow => {
            for center in 0..tokens.len() {
                let lo = center.saturating_sub(w);
                let hi = (center + w).min(tokens.len() - 1);
                for i in lo..=hi {
                    for j in i + 1..=hi {
                        add(i, j);
                    }
                }
            }
        }
    }
    expected
}

fn assert_same(actual: &CooccurrenceMap, expected: &HashMap<PairKey, f64>) {
    assert_eq!(actual.len(), expected.len());
    for (key, weight) in actual.iter() {
        let want = expected.get(key).copied().unwrap_or(f64::NAN);
        assert!((weight - want).abs() < 1e-9, "{key:?}: {weight} vs {want}");
    }
}

#[test]
fn cooccurrence_matches_cat_example() {
    let tokens: Vec<String> = ["cat", "sat", "mat", "cat", "likes", "mat"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let engine = CooccurrenceEngine::new(TextConfig::default()).unwrap();
    let map = engine.count(&tokens);

    // every window overlap adds to the pair
    assert!((map.get("cat", "mat").unwrap() - 4.8).abs() < 1e-9);
    assert!((map.get("mat", "cat").unwrap() - 4.8).abs() < 1e-9);
    assert!(map.get("cat", "cat").is_none());

    let pairwise = CooccurrenceEngine::new(TextConfig::pairwise()).unwrap().count(&tokens);
    assert!((pairwise.get("cat", "mat").unwrap() - 0.8).abs() < 1e-9);
}

proptest! {
    #[test]
    fn proptest_pairwise_matches_position_enumeration(
        tokens in token_seq(60),
        window in 1usize..8,
    ) {
        let config = TextConfig { window_size: window, ..TextConfig::pairwise() };
        let map = count_cooccurrence(&tokens, &config);
        assert_same(&map, &brute_force(&tokens, &config));
    }

    #[test]
    fn proptest_pairwise_respects_window(
        tokens in token_seq(60),
        window in 1usize..8,
    ) {
        let config = TextConfig { window_size: window, ..TextConfig::pairwise() };
        let map = count_cooccurrence(&tokens, &config);
        for (key, _) in map.iter() {
            let near = (0..tokens.len()).any(|i| {
                (i + 1..tokens.len().min(i + window + 1))
                    .any(|j| PairKey::new(&tokens[i], &tokens[j]).as_ref() == Some(key))
            });
            prop_assert!(near, "{:?} counted without a position pair within {}", key, window);
        }
    }

    #[test]
    fn proptest_sliding_matches_window_enumeration(
        tokens in token_seq(60),
        window in 1usize..8,
    ) {
        let config = TextConfig { window_size: window, ..Default::default() };
        let map = count_cooccurrence(&tokens, &config);
        assert_same(&map, &brute_force(&tokens, &config));
    }

    #[test]
    fn proptest_no_self_pairs_and_positive_weights(tokens in token_seq(60)) {
        let map = count_cooccurrence(&tokens, &TextConfig::default());
        for (key, weight) in map.iter() {
            prop_assert_ne!(key.first(), key.second());
            prop_assert!(weight > 0.0);
        }
    }

    #[test]
    fn proptest_contiguous_shards_match_single_pass(
        tokens in token_seq(120),
        window in 1usize..6,
        shards in 1usize..9,
    ) {
        let config = TextConfig {
            window_size: window,
            sharding: ShardStrategy::Contiguous,
            max_workers: Some(4),
            ..Default::default()
        };
        let engine = CooccurrenceEngine::new(config.clone()).unwrap();
        let sharded = engine.count_with_shards(&tokens, shards);
        assert_same(&sharded, &brute_force(&tokens, &config));
    }

    #[test]
    fn proptest_strided_single_shard_equals_single_pass(tokens in token_seq(60)) {
        let config = TextConfig {
            sharding: ShardStrategy::Strided,
            max_workers: Some(2),
            ..Default::default()
        };
        let engine = CooccurrenceEngine::new(config.clone()).unwrap();
        assert_same(&engine.count_with_shards(&tokens, 1), &brute_force(&tokens, &config));
    }
}
