use crate::config::{ShardStrategy, TextConfig};
use crate::cooccurrence::{count_ids, CooccurrenceMap, PartialCounts, Vocabulary};
use crate::error::{Result, TextError};
use rayon::prelude::*;
use std::ops::Range;

const MAX_WORKERS: usize = 32;
const WORKERS_ENV: &str = "MINDMAP_COOCCURRENCE_WORKERS";

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_worker_count(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_WORKERS)
}

fn worker_count_from_env() -> usize {
    let raw = std::env::var(WORKERS_ENV).ok();
    parse_worker_count(raw.as_deref(), default_worker_count())
}

/// Portion of the sequence handed to one worker
enum Shard {
    /// Anchor positions over the shared id sequence
    Anchors(Range<usize>),
    /// Compacted subsequence counted as if it were the whole text
    Strided(Vec<u32>),
}

/// Parallel co-occurrence counter backed by a bounded worker pool.
///
/// `count` blocks until every shard has finished and the partial results are merged;
/// nothing is exposed before the join.
pub struct CooccurrenceEngine {
    config: TextConfig,
    pool: rayon::ThreadPool,
    workers: usize,
}

impl CooccurrenceEngine {
    pub fn new(config: TextConfig) -> Result<Self> {
        config.validate().map_err(TextError::InvalidConfig)?;

        let mut workers = worker_count_from_env();
        if let Some(max) = config.max_workers {
            workers = workers.min(max);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("cooccurrence-{idx}"))
            .build()
            .map_err(|e| TextError::ThreadPool(e.to_string()))?;

        log::debug!("Co-occurrence pool ready with {workers} workers");

        Ok(Self {
            config,
            pool,
            workers,
        })
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Size of the worker pool
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Shards used for an input of `token_count` tokens: grows with input size,
    /// capped by the pool size
    pub fn shard_count(&self, token_count: usize) -> usize {
        token_count
            .div_ceil(self.config.tokens_per_worker)
            .clamp(1, self.workers)
    }

    /// Count co-occurrences with the size-derived shard count
    pub fn count(&self, tokens: &[String]) -> CooccurrenceMap {
        self.count_with_shards(tokens, self.shard_count(tokens.len()))
    }

    /// Count co-occurrences with an explicit shard count.
    ///
    /// With [`ShardStrategy::Contiguous`] the result does not depend on `shards`.
    /// With [`ShardStrategy::Strided`] it does: every shard only sees every n-th token.
    pub fn count_with_shards(&self, tokens: &[String], shards: usize) -> CooccurrenceMap {
        if tokens.len() < 2 {
            return CooccurrenceMap::new();
        }

        let shards = shards.clamp(1, tokens.len());
        let (vocab, ids) = Vocabulary::intern(tokens, &self.config);
        let plan = plan_shards(&ids, shards, self.config.sharding);

        log::info!(
            "Counting co-occurrences: {} tokens, {} distinct, {} shard(s), {:?}",
            ids.len(),
            vocab.len(),
            plan.len(),
            self.config.sharding
        );

        let config = &self.config;
        let partials: Vec<PartialCounts> = self.pool.install(|| {
            plan.par_iter()
                .map(|shard| match shard {
                    Shard::Anchors(range) => count_ids(&ids, range.clone(), &vocab, config),
                    Shard::Strided(view) => count_ids(view, 0..view.len(), &vocab, config),
                })
                .collect()
        });

        // Merge in shard order so first-seen order is deterministic
        let mut merged = PartialCounts::default();
        for partial in partials {
            merged.merge(partial);
        }

        let map = merged.into_map(&vocab);
        log::debug!("Merged {} co-occurring pairs", map.len());
        map
    }
}

fn plan_shards(ids: &[u32], shards: usize, strategy: ShardStrategy) -> Vec<Shard> {
    match strategy {
        ShardStrategy::Contiguous => {
            let chunk = ids.len().div_ceil(shards);
            (0..shards)
                .map(|k| {
                    let start = (k * chunk).min(ids.len());
                    let end = ((k + 1) * chunk).min(ids.len());
                    Shard::Anchors(start..end)
                })
                .filter(|shard| matches!(shard, Shard::Anchors(r) if !r.is_empty()))
                .collect()
        }
        ShardStrategy::Strided => (0..shards)
            .map(|k| Shard::Strided(ids.iter().skip(k).step_by(shards).copied().collect()))
            .collect(),
    }
}
