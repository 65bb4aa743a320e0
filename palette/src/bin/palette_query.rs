//! Run a palette query against a JSON catalog from the command line.
//!
//! Usage:
//!     cargo run --bin palette-query -- --catalog catalog.json [--config palette.json] "query"
//!
//! Highlighted spans are printed in brackets. Set RUST_LOG=debug for timings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use palette::{group_by_category, rank, Catalog, MatchedField, PaletteConfig, RankedSearchResult, SearchIndex};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "palette-query", about = "Rank palette entries for a query")]
struct Args {
    /// JSON file with `commands`, `actions`, `conversations` and `notes` lists
    #[arg(long)]
    catalog: PathBuf,

    /// Optional JSON ranker config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured result limit
    #[arg(long)]
    limit: Option<usize>,

    /// Print results in per-category sections
    #[arg(long)]
    grouped: bool,

    /// Query text; omit for the browsing view
    #[arg(default_value = "")]
    query: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PaletteConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => PaletteConfig::default().with_env_overrides(),
    };
    let mut options = config.rank_options();
    if let Some(limit) = args.limit {
        options.limit = limit;
    }

    let raw = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("reading catalog {}", args.catalog.display()))?;
    let catalog = Catalog::from_json_str(&raw).context("parsing catalog")?;
    let index = SearchIndex::build(catalog.into_items());

    let results = rank(&index, &args.query, &options);
    if results.is_empty() {
        println!("no matches");
        return Ok(());
    }

    if args.grouped {
        for (category, section) in group_by_category(results, &options.category_order) {
            println!("{category}:");
            for result in &section {
                println!("  {}", format_result(result));
            }
        }
    } else {
        for result in &results {
            println!("{}", format_result(result));
        }
    }
    Ok(())
}

fn format_result(result: &RankedSearchResult<'_>) -> String {
    let shown = match result.matched_field {
        MatchedField::Label | MatchedField::None => mark_ranges(result),
        MatchedField::Keyword(_) | MatchedField::Description => {
            format!("{} ({})", result.item.label, mark_ranges(result))
        }
    };
    format!(
        "{:<12} {:>8.2} {:<9} {}",
        result.item.category.as_str(),
        result.rank_score,
        result.match_kind.as_str(),
        shown,
    )
}

/// Field text with matched spans wrapped in brackets.
fn mark_ranges(result: &RankedSearchResult<'_>) -> String {
    let text: Vec<char> = result.matched_text().chars().collect();
    let mut out = String::with_capacity(text.len() + result.ranges.len() * 2);
    let mut ranges = result.ranges.iter().peekable();
    for (i, ch) in text.iter().enumerate() {
        if ranges.peek().is_some_and(|r| r.start == i) {
            out.push('[');
        }
        out.push(*ch);
        if ranges.peek().is_some_and(|r| r.end == i + 1) {
            out.push(']');
            ranges.next();
        }
    }
    out
}
