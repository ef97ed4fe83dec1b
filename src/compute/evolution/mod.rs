//! Evolutionary search for a hidden word.
//!
//! # Overview
//!
//! The search keeps a single parent pair per generation:
//!
//! - **Fitness** (`fitness`): squared codepoint distance to the target
//! - **Text Operations** (`genome`): random text, point mutation, suffix exchange
//! - **Candidates** (`candidate`): scored text and the per-run context
//! - **Operators** (`operators`): k-point crossover with retry, compatibility gate
//! - **History** (`history`): parent pairs, best-so-far trajectory, table and JSON export
//! - **Search** (`search`): the generation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use henyo::compute::evolution::EvolutionEngine;
//! use henyo::schema::{SearchConfig, Target};
//!
//! let target = Target::new("cat").unwrap();
//! let mut engine = EvolutionEngine::new(target, SearchConfig::default()).unwrap();
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: {} ({})",
//!         progress.generation, progress.best.text, progress.best.correctness);
//! });
//!
//! println!("Found {:?} after {} generations", result.best.text, result.stats.generations);
//! ```

mod candidate;
mod fitness;
mod genome;
mod history;
mod operators;
mod search;

pub use candidate::{Candidate, RunContext};
pub use fitness::{FitnessEvaluator, score};
pub use genome::{MutationOperator, TextRng, exchange_suffixes};
pub use history::{GenerationHistory, load_result, render_table, save_result};
pub use operators::{CompatibilityGate, CrossoverOperator, CrossoverOutcome, PairingOutcome};
pub use search::EvolutionEngine;
