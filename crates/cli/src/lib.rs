use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mindmap_category::{CacheConfig, CategoryResolver, CategoryStore, StaticTaxonomy};
use mindmap_graph::LayoutAlgorithm;
use mindmap_pipeline::{MindMapOptions, MindMapPipeline};
use mindmap_text::Language;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&json)
}

#[derive(Parser)]
#[command(name = "mindmap")]
#[command(about = "Turn text into a categorized, laid out mind map", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a mind map from text and print it as JSON
    Generate(GenerateArgs),

    /// Category cache maintenance
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Rewrite a cache file, upgrading legacy entries to timestamped records
    Migrate(MigrateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Text file to read (stdin when omitted or "-")
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Language code (en, de)
    #[arg(short, long, default_value = "en")]
    lang: String,

    /// TOML options file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Co-occurrence window size
    #[arg(long)]
    window: Option<usize>,

    /// Keep only the N heaviest links before building the graph
    #[arg(long)]
    top_k: Option<usize>,

    /// Maximum number of graph edges
    #[arg(long)]
    max_edges: Option<usize>,

    /// Layout algorithm
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Skip category resolution
    #[arg(long)]
    live: bool,

    /// Taxonomy JSON file: {"en": {"label": "category" | ["category", ...]}}
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Edit distance within which taxonomy labels are offered as candidates
    #[arg(long, default_value_t = 2)]
    max_distance: usize,

    /// Directory for the per-language category cache files
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct MigrateArgs {
    /// Language whose cache file is migrated
    #[arg(short, long)]
    lang: String,

    /// Directory holding the cache files
    #[arg(long)]
    cache_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Spring,
    Energy,
    Partitioned,
}

impl From<LayoutArg> for LayoutAlgorithm {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Spring => LayoutAlgorithm::Spring,
            LayoutArg::Energy => LayoutAlgorithm::Energy,
            LayoutArg::Partitioned => LayoutAlgorithm::Partitioned,
        }
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Cache(CacheCommands::Migrate(args)) => run_migrate(args),
    }
}

fn load_options(args: &GenerateArgs) -> Result<MindMapOptions> {
    let mut options = match &args.config {
        Some(path) => MindMapOptions::from_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => MindMapOptions::default(),
    };

    if let Some(window) = args.window {
        options.text.window_size = window;
    }
    if let Some(top_k) = args.top_k {
        options.rank.top_k = Some(top_k);
    }
    if let Some(max_edges) = args.max_edges {
        options.graph.max_edges = max_edges;
    }
    if let Some(layout) = args.layout {
        options.layout.algorithm = layout.into();
    }
    if args.live {
        options.rank.live_mode = true;
    }
    if let Some(dir) = &args.cache_dir {
        options.cache.dir = Some(dir.clone());
    }

    options.validate()?;
    Ok(options)
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            Ok(text)
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let language = Language::from_code(&args.lang)?;
    let options = load_options(&args)?;
    let text = read_input(args.input.as_ref())?;

    let mut resolver = None;
    let mut pipeline = MindMapPipeline::new(options.clone())?;
    if let Some(path) = &args.taxonomy {
        let taxonomy = StaticTaxonomy::from_json_file(path, args.max_distance)
            .with_context(|| format!("Failed to load taxonomy {}", path.display()))?;
        let store = CategoryStore::new(options.cache.clone())?;
        let categorizer = Arc::new(CategoryResolver::new(taxonomy, store));
        pipeline = pipeline.with_categorizer(categorizer.clone());
        resolver = Some(categorizer);
    }

    let map = pipeline.generate(&text, language)?;

    if let Some(resolver) = resolver {
        let stats = resolver.stats();
        log::info!(
            "Categories: {} cache hits, {} lookups ({} not found, {} service errors)",
            stats.cache_hits,
            stats.lookups,
            stats.not_found,
            stats.service_errors
        );
    }
    log::info!(
        "Mind map: {} nodes, {} edges, {:?} layout in {} iterations",
        map.graph.node_count(),
        map.graph.edge_count(),
        map.report.algorithm,
        map.report.iterations
    );

    print_json(&map.view(), args.pretty)
}

fn run_migrate(args: MigrateArgs) -> Result<()> {
    let language = Language::from_code(&args.lang)?;
    let store = CategoryStore::new(CacheConfig::with_dir(&args.cache_dir))?;
    let report = store.migrate(language).with_context(|| {
        format!(
            "Failed to migrate {} cache in {}",
            language,
            args.cache_dir.display()
        )
    })?;
    print_json(&report, true)
}
