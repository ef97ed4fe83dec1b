//! Henyo CLI - Guess a word by evolution.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use henyo::{
    EvolutionEngine,
    compute::evolution::{render_table, save_result},
    schema::{SearchConfig, Target, TrajectoryPolicy, parse_budget},
};

#[derive(Parser, Debug)]
#[command(name = "henyo")]
#[command(about = "Guess a word with a small genetic algorithm")]
struct Cli {
    /// The word to be guessed (ASCII letters only)
    #[arg(required_unless_present = "example_config")]
    word: Option<String>,
    /// Maximum number of generations (runs until matched if omitted)
    #[arg(value_parser = parse_budget)]
    generations: Option<usize>,
    /// JSON search configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Record every generation's best even when it is worse than before
    #[arg(long)]
    raw_trajectory: bool,
    /// Keep evolving after a match until the generation budget is spent
    #[arg(long, requires = "generations")]
    run_to_budget: bool,
    /// Write the full run result as JSON
    #[arg(long)]
    export: Option<PathBuf>,
    /// Only print the final table
    #[arg(long, short)]
    quiet: bool,
    /// Print the default configuration and exit
    #[arg(long)]
    example_config: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if cli.example_config {
        print_example_config();
        return;
    }

    let word = cli.word.unwrap_or_default();
    let target = Target::new(&word).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => SearchConfig::default(),
    };

    if cli.generations.is_some() {
        config.termination.max_generations = cli.generations;
    }
    if cli.run_to_budget {
        config.termination.stop_on_convergence = false;
    }
    if cli.raw_trajectory {
        config.trajectory = TrajectoryPolicy::Raw;
    }
    if cli.seed.is_some() {
        config.random_seed = cli.seed;
    }

    let mut engine = EvolutionEngine::new(target, config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let quiet = cli.quiet;
    let result = engine.run_with_callback(|progress| {
        if !quiet {
            println!(
                "Generation {:>5}: {}  (cost {})",
                progress.generation, progress.best.text, progress.best.correctness
            );
        }
    });

    println!();
    print!("{}", render_table(&result.trajectory));
    println!();
    match result.stats.converged_at {
        Some(generation) => println!("Matched \"{}\" at generation {}", result.target, generation),
        None => println!(
            "No match within {} generations (best: \"{}\", cost {})",
            result.stats.generations, result.best.text, result.best.correctness
        ),
    }
    println!(
        "Fallbacks: {} crossover, {} degenerate pairs; seed {}; {:.3}s",
        result.stats.crossover_fallbacks,
        result.stats.degenerate_pairs,
        result.stats.random_seed,
        result.stats.elapsed_seconds
    );

    if let Some(path) = &cli.export {
        save_result(&result, path).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {}", path.display(), e);
            std::process::exit(1);
        });
        println!("Result written to {}", path.display());
    }
}

fn print_example_config() {
    let config = SearchConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
