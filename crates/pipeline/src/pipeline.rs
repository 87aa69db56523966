use crate::error::Result;
use crate::options::MindMapOptions;
use crate::view::MindMap;
use mindmap_category::Categorizer;
use mindmap_graph::{rank_links, GraphBuilder, LayoutEngine};
use mindmap_text::{
    subject_chain_links, ChainClass, CooccurrenceEngine, CooccurrenceMap, Language, Preprocessor,
    Tagger,
};
use std::sync::Arc;

/// Where word pairs come from
enum PairSource {
    /// Windowed co-occurrence over the content tokens
    Cooccurrence,
    /// Consecutive subject-like tokens per sentence, as tagged by an external parser
    SubjectChains {
        tagger: Box<dyn Tagger>,
        classes: Vec<ChainClass>,
    },
}

/// Text → mind map generator with long-lived collaborators.
///
/// Reuse one pipeline across calls to keep the worker pool and the category
/// cache warm; it is safe to share between threads.
pub struct MindMapPipeline {
    options: MindMapOptions,
    preprocessor: Preprocessor,
    engine: CooccurrenceEngine,
    builder: GraphBuilder,
    layout: LayoutEngine,
    categorizer: Option<Arc<dyn Categorizer>>,
    source: PairSource,
}

impl MindMapPipeline {
    pub fn new(options: MindMapOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new(),
            engine: CooccurrenceEngine::new(options.text.clone())?,
            builder: GraphBuilder::new(options.graph.clone())?,
            layout: LayoutEngine::new(options.layout.clone())?,
            categorizer: None,
            source: PairSource::Cooccurrence,
            options,
        })
    }

    /// Resolve categories through `categorizer` (ignored in live mode)
    pub fn with_categorizer(mut self, categorizer: Arc<dyn Categorizer>) -> Self {
        self.categorizer = Some(categorizer);
        self
    }

    /// Replace the default segmenter/restorer setup
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Link subject chains found by `tagger` instead of counting co-occurrences
    pub fn with_subject_chains(
        mut self,
        tagger: impl Tagger + 'static,
        classes: Vec<ChainClass>,
    ) -> Self {
        self.source = PairSource::SubjectChains {
            tagger: Box::new(tagger),
            classes,
        };
        self
    }

    pub fn options(&self) -> &MindMapOptions {
        &self.options
    }

    pub fn engine(&self) -> &CooccurrenceEngine {
        &self.engine
    }

    /// Build the mind map for `text`.
    ///
    /// Text without any word pair gives an empty map. The category cache is
    /// flushed once per call, after ranking.
    pub fn generate(&self, text: &str, language: Language) -> Result<MindMap> {
        let categorizer = if self.options.rank.live_mode {
            None
        } else {
            self.categorizer.as_deref()
        };
        if let Some(categorizer) = categorizer {
            categorizer.prepare(language)?;
        }

        let pairs = self.pairs(text, language);
        if pairs.is_empty() {
            log::warn!(
                "No co-occurring words in {} chars of {} text, returning an empty mind map",
                text.len(),
                language
            );
            return Ok(MindMap::empty(language, self.options.layout.algorithm));
        }

        let links = rank_links(&pairs, &self.options.rank, categorizer, language);

        if let Some(categorizer) = categorizer {
            if let Err(err) = categorizer.checkpoint() {
                log::warn!("Failed to persist category cache: {err}");
            }
        }

        let graph = self.builder.build(&links);
        let layout = self.layout.layout(&graph);

        Ok(MindMap {
            language,
            links,
            graph,
            positions: layout.positions,
            report: layout.report,
        })
    }

    /// Parse `language` and build the mind map
    pub fn generate_for(&self, text: &str, language: &str) -> Result<MindMap> {
        let language = Language::from_code(language)?;
        self.generate(text, language)
    }

    fn pairs(&self, text: &str, language: Language) -> CooccurrenceMap {
        match &self.source {
            PairSource::Cooccurrence => {
                let tokens = self.preprocessor.preprocess(text, language);
                self.engine.count(&tokens)
            }
            PairSource::SubjectChains { tagger, classes } => {
                let sentences = self.preprocessor.raw_sentences(text);
                subject_chain_links(&sentences, tagger.as_ref(), classes)
            }
        }
    }
}

/// Build a mind map with the default collaborators and no taxonomy.
///
/// Fails only for an unsupported language or invalid options; every category
/// in the result is `unknown`.
pub fn generate_mind_map(
    text: &str,
    language: &str,
    options: &MindMapOptions,
) -> Result<MindMap> {
    let language = Language::from_code(language)?;
    MindMapPipeline::new(options.clone())?.generate(text, language)
}
