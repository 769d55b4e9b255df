use anyhow::Context;
use clap::Parser;
use outfitx::prelude::*;
use outfitx::prompt;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend a top/bottom outfit from a wardrobe catalog
#[derive(Parser, Debug)]
#[command(name = "outfitx")]
#[command(about = "Recommend a compatible outfit from a wardrobe catalog", long_about = None)]
struct Args {
    /// Path to the catalog JSON (array of garment records)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Path to the classifier model JSON
    #[arg(short, long)]
    model: PathBuf,

    /// Id of a garment that must be part of the outfit
    #[arg(long)]
    pinned: Option<String>,

    /// Preference prompt, e.g. "top: red, solid"
    #[arg(long, default_value = "")]
    prompt: String,

    /// Extra preference prompt merged with --prompt, e.g. for the other side
    #[arg(long)]
    and_prompt: Option<String>,

    /// Minimum compatibility score to accept a pair
    #[arg(long, default_value_t = outfitx::DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Seed for the candidate order
    #[arg(long)]
    seed: Option<u64>,

    /// Score candidates in parallel
    #[arg(long)]
    parallel: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Report<'a> {
    outcome: &'a DecisionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<[String; 2]>,
    stats: SearchStats,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting OutfitX v{}", env!("CARGO_PKG_VERSION"));

    let catalog = CatalogStore::new(&args.catalog)
        .load()
        .with_context(|| format!("failed to load catalog {}", args.catalog.display()))?;
    let model = ModelStore::new(&args.model)
        .load()
        .with_context(|| format!("failed to load model {}", args.model.display()))?;

    let pinned = args
        .pinned
        .as_deref()
        .map(|id| pinned_garment(&catalog, id))
        .transpose()?;

    let mut filters = prompt::parse(&args.prompt);
    if let Some(extra) = &args.and_prompt {
        filters = filters.merge(prompt::parse(extra));
    }

    let config = SelectionConfig {
        threshold: args.threshold,
        seed: args.seed,
        parallel: args.parallel,
    };
    let engine = Recommender::with_config(model, config)?;

    let (outcome, stats) = engine.select_detailed(&catalog, pinned, &filters, None)?;

    let report = Report {
        outcome: &outcome,
        images: outcome
            .pair()
            .map(|(top, bottom)| [top.image_path(), bottom.image_path()]),
        stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
