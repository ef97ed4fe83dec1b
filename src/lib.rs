//! Henyo - word guessing by a small genetic algorithm.
//!
//! A hidden word is recovered by repeatedly scoring, mutating, and
//! recombining candidate strings under a squared codepoint distance.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, target validation, and serializable results
//! - `compute`: Fitness, operators, and the generation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use henyo::{EvolutionEngine, SearchConfig, Target};
//!
//! let config = SearchConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut engine = EvolutionEngine::new(Target::new("cat").unwrap(), config).unwrap();
//! let result = engine.run();
//!
//! println!("{}", henyo::compute::evolution::render_table(&result.trajectory));
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Candidate, EvolutionEngine, GenerationHistory};
pub use schema::{ConfigError, EvolutionResult, SearchConfig, Target};
