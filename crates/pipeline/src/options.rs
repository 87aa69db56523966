use crate::error::{PipelineError, Result};
use mindmap_category::CacheConfig;
use mindmap_graph::{GraphConfig, LayoutConfig, RankOptions};
use mindmap_text::TextConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable of a mind map run.
///
/// Loadable from TOML; omitted sections and fields keep their defaults:
///
/// ```toml
/// [text]
/// window_size = 5
///
/// [rank]
/// top_k = 100
///
/// [layout]
/// algorithm = "partitioned"
///
/// [layout.partition]
/// grouping = "connected_component"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MindMapOptions {
    pub text: TextConfig,
    pub rank: RankOptions,
    pub graph: GraphConfig,
    pub layout: LayoutConfig,
    pub cache: CacheConfig,
}

impl MindMapOptions {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let options: Self = toml::from_str(raw)
            .map_err(|err| PipelineError::config(format!("failed to parse options: {err}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&raw)?;
        log::debug!("Loaded options from {:?}", path);
        Ok(options)
    }

    /// Validate every section, naming the first one that is invalid
    pub fn validate(&self) -> Result<()> {
        let sections = [
            ("text", self.text.validate()),
            ("rank", self.rank.validate()),
            ("graph", self.graph.validate()),
            ("layout", self.layout.validate()),
            ("cache", self.cache.validate()),
        ];
        for (section, outcome) in sections {
            if let Err(msg) = outcome {
                return Err(PipelineError::config(format!("[{section}] {msg}")));
            }
        }
        Ok(())
    }
}
