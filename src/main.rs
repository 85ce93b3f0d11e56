//! Builds one "find the missing card" puzzle and writes its HTML page
//!
//! Usage:
//!   cargo run --release                          # random seed, ./puzzle
//!   cargo run --release -- --seed 42 -o out      # reproducible puzzle in ./out
//!   cargo run --release -- --config puzzle.json --rebalance-fill

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use separator::Separatable;

use no_set_puzzle::config::PuzzleConfig;
use no_set_puzzle::io_helpers::save_puzzle;
use no_set_puzzle::puzzle::generate_puzzle;
use no_set_puzzle::render::answer_artifact_name;
use no_set_puzzle::utils::*;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "no-set-puzzle")]
#[command(version)]
#[command(about = "Generates 'find the missing card' Set puzzles", long_about = None)]
struct Args {
    /// JSON file with the generation settings (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the random generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Random shuffles tried by the layout optimizer
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Construction attempts discarded before giving up
    #[arg(long)]
    max_restarts: Option<u64>,

    /// Relabel fills so that flood is the rarest
    #[arg(long)]
    rebalance_fill: bool,

    /// Directory receiving index.html and puzzle.json
    #[arg(short, long, default_value = "puzzle")]
    output_dir: PathBuf,

    /// Icons directory, as referenced from index.html
    #[arg(long, default_value = "icons")]
    icons: String,

    /// Keep a timestamped transcript in the output directory
    #[arg(long)]
    log_file: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only write the files, print nothing but logs
    #[arg(short, long)]
    quiet: bool,
}

fn load_config(args: &Args) -> Result<PuzzleConfig> {
    let mut config = match &args.config {
        Some(path) => PuzzleConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PuzzleConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if args.max_restarts.is_some() {
        config.max_restarts = args.max_restarts;
    }
    if args.rebalance_fill {
        config.rebalance_fill = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    if args.quiet {
        test_print_off();
    }

    let config = load_config(&args)?;
    if args.log_file {
        std::fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("creating {}", args.output_dir.display()))?;
        init_log_file(&args.output_dir);
    }

    banner("No-Set Puzzle Generator");
    test_print(&format!(
        "   - {} cards in a {}x{} grid, {} layout shuffles",
        config.target_size,
        config.rows,
        config.cols,
        (config.iterations as u64).separated_string()
    ));

    let puzzle = generate_puzzle(&config).context("generating puzzle")?;
    test_print(&format!("   - seed = {}", puzzle.seed));
    test_print(&format!("   - shuffle score = {}\n", puzzle.score()));
    test_print(&puzzle.arrangement.to_string());

    let saved = save_puzzle(&puzzle, &args.output_dir, &args.icons)
        .with_context(|| format!("writing puzzle to {}", args.output_dir.display()))?;
    test_print(&format!("   - page: {}", saved.html.display()));
    test_print(&format!("   - description: {}", saved.description.display()));
    test_print(&format!("   - answer image name: {}", answer_artifact_name(puzzle.answer())));
    Ok(())
}
