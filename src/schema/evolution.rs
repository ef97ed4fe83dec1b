//! Progress and result types produced by the word search.
//!
//! These are plain serializable snapshots: the engine keeps its own
//! `Candidate` values and converts them here for display and export.

use serde::{Deserialize, Serialize};

/// Snapshot of a scored candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// Candidate text.
    pub text: String,
    /// Squared codepoint distance to the target (0 is an exact match).
    pub correctness: u64,
}

/// The two parents produced in one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// 1-based generation index.
    pub generation: usize,
    /// Parent produced from the previous pair.
    pub parent_a: CandidateSnapshot,
    /// Freshly random parent (or a copy of `parent_a` for a degenerate pair).
    pub parent_b: CandidateSnapshot,
}

/// Progress update emitted after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generation just produced (1-based).
    pub generation: usize,
    /// Generation budget, if any.
    pub total_generations: Option<usize>,
    /// Best-so-far trajectory entry for this generation.
    pub best: CandidateSnapshot,
    /// Representative of this generation alone.
    pub generation_best: CandidateSnapshot,
    /// Current phase of the loop.
    pub phase: EvolutionPhase,
}

/// Phase of the evolution loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// No generation produced yet.
    #[default]
    Initializing,
    /// Producing generations.
    Running,
    /// A representative matched the target.
    Converged,
    /// The generation budget ran out without a match.
    BudgetExhausted,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Target word.
    pub target: String,
    /// Best candidate found.
    pub best: CandidateSnapshot,
    /// Best-so-far trajectory, one entry per generation.
    pub trajectory: Vec<CandidateSnapshot>,
    /// Parent pairs, one entry per generation.
    pub generations: Vec<GenerationSnapshot>,
    /// Statistics from the run.
    pub stats: EvolutionStats,
}

/// Statistics from a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total generations run.
    pub generations: usize,
    /// Generations whose first parent came from the mutated-clone fallback
    /// after every crossover attempt failed to improve.
    pub crossover_fallbacks: usize,
    /// Generations where no compatible second parent was found.
    pub degenerate_pairs: usize,
    /// First generation whose representative matched the target.
    pub converged_at: Option<usize>,
    /// Seed of the random source, for replaying the run.
    pub random_seed: u64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason the run stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// A representative matched the target.
    Converged,
    /// Reached the generation budget.
    BudgetExhausted,
}

impl From<StopReason> for EvolutionPhase {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::Converged => EvolutionPhase::Converged,
            StopReason::BudgetExhausted => EvolutionPhase::BudgetExhausted,
        }
    }
}
