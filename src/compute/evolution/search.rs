//! The generation loop.

use std::time::Instant;

use log::{debug, info};

use crate::schema::{
    ConfigError, EvolutionPhase, EvolutionProgress, EvolutionResult, EvolutionStats, SearchConfig,
    StopReason, Target,
};

use super::candidate::{Candidate, RunContext};
use super::genome::TextRng;
use super::history::GenerationHistory;
use super::operators::{CompatibilityGate, CrossoverOperator, PairingOutcome};

/// Evolution engine that runs the search.
///
/// Each generation produces one parent pair: the first parent comes from
/// crossing the previous pair, the second is a fresh random candidate that
/// passed the compatibility gate. Generation 1 is two random candidates.
pub struct EvolutionEngine {
    config: SearchConfig,
    ctx: RunContext,
    rng: TextRng,
    random_seed: u64,
    crossover: CrossoverOperator,
    gate: CompatibilityGate,
    history: GenerationHistory,
    phase: EvolutionPhase,
    crossover_fallbacks: usize,
    degenerate_pairs: usize,
    converged_at: Option<usize>,
}

impl EvolutionEngine {
    /// Create a new evolution engine.
    pub fn new(target: Target, config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let random_seed = config.random_seed.unwrap_or_else(rand::random);
        let crossover = CrossoverOperator::new(&config, target.len())?;
        let gate = CompatibilityGate::new(&config);
        let ctx = RunContext::new(target, &config)?;

        Ok(Self {
            rng: TextRng::new(random_seed),
            random_seed,
            crossover,
            gate,
            ctx,
            history: GenerationHistory::new(config.trajectory),
            phase: EvolutionPhase::Initializing,
            crossover_fallbacks: 0,
            degenerate_pairs: 0,
            converged_at: None,
            config,
        })
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Seed of the random source.
    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    /// Clear the history so the next run starts from generation 1.
    ///
    /// The random source is not reseeded.
    pub fn reset(&mut self) {
        self.history = GenerationHistory::new(self.config.trajectory);
        self.phase = EvolutionPhase::Initializing;
        self.crossover_fallbacks = 0;
        self.degenerate_pairs = 0;
        self.converged_at = None;
        self.ctx.set_generation(0);
    }

    /// Produce the next generation and return its trajectory entry.
    pub fn step(&mut self) -> &Candidate {
        let generation = self.history.len() + 1;
        self.ctx.set_generation(generation);

        let (first, second) = match self.history.last_pair() {
            None => (
                Candidate::random(&self.ctx, &mut self.rng),
                Candidate::random(&self.ctx, &mut self.rng),
            ),
            Some((a, b)) => {
                let outcome = self.crossover.crossover(a, b, &self.ctx, &mut self.rng);
                if outcome.is_fallback() {
                    self.crossover_fallbacks += 1;
                }
                let first = outcome.into_candidate();

                let second = match self.gate.select_partner(&first, &self.ctx, &mut self.rng) {
                    PairingOutcome::Compatible { partner, .. } => partner,
                    PairingOutcome::Degenerate => {
                        self.degenerate_pairs += 1;
                        first.clone()
                    }
                };
                (first, second)
            }
        };

        if self.converged_at.is_none() && Candidate::fitter(&first, &second).is_optimal() {
            info!("matched {} at generation {}", self.ctx.target(), generation);
            self.converged_at = Some(generation);
        }
        self.phase = if self.converged_at.is_some() {
            EvolutionPhase::Converged
        } else {
            EvolutionPhase::Running
        };

        debug!(
            "generation {}: {} ({}) / {} ({})",
            generation,
            first,
            first.correctness(),
            second,
            second.correctness()
        );
        self.history.record(first, second)
    }

    /// Get current progress, or `None` before the first generation.
    pub fn progress(&self) -> Option<EvolutionProgress> {
        let best = self.history.current()?;
        let (a, b) = self.history.last_pair()?;

        Some(EvolutionProgress {
            generation: self.history.len(),
            total_generations: self.config.termination.max_generations,
            best: best.to_snapshot(),
            generation_best: Candidate::fitter(a, b).to_snapshot(),
            phase: self.phase,
        })
    }

    /// Check if evolution should stop.
    fn should_stop(&self) -> Option<StopReason> {
        let reason = if self.converged_at.is_some() {
            StopReason::Converged
        } else {
            StopReason::BudgetExhausted
        };

        if self.converged_at.is_some() && self.config.termination.stop_on_convergence {
            return Some(reason);
        }

        match self.config.termination.max_generations {
            Some(limit) if self.history.len() >= limit => Some(reason),
            _ => None,
        }
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> EvolutionResult
    where
        F: FnMut(&EvolutionProgress),
    {
        let start_time = Instant::now();
        self.reset();

        info!(
            "searching for a {}-letter word (seed {}, budget {:?})",
            self.ctx.target().len(),
            self.random_seed,
            self.config.termination.max_generations
        );

        // Evolution loop
        let stop_reason = loop {
            self.step();

            if let Some(progress) = self.progress() {
                callback(&progress);
            }

            if let Some(reason) = self.should_stop() {
                break reason;
            }
        };
        self.phase = stop_reason.into();

        let elapsed = start_time.elapsed().as_secs_f64();
        info!(
            "stopped after {} generations: {:?}",
            self.history.len(),
            stop_reason
        );

        let best = self
            .history
            .best()
            .map(Candidate::to_snapshot)
            .expect("No generations");

        EvolutionResult {
            target: self.ctx.target().to_string(),
            best,
            trajectory: self.history.trajectory_snapshots(),
            generations: self.history.generation_snapshots(),
            stats: EvolutionStats {
                generations: self.history.len(),
                crossover_fallbacks: self.crossover_fallbacks,
                degenerate_pairs: self.degenerate_pairs,
                converged_at: self.converged_at,
                random_seed: self.random_seed,
                elapsed_seconds: elapsed,
                stop_reason,
            },
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TerminationConfig, TrajectoryPolicy};

    fn config(max_generations: Option<usize>, seed: u64) -> SearchConfig {
        SearchConfig {
            termination: TerminationConfig {
                max_generations,
                ..Default::default()
            },
            random_seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = EvolutionEngine::new(Target::new("cat").unwrap(), config(None, 1)).unwrap();
        assert_eq!(engine.phase(), EvolutionPhase::Initializing);
        assert!(engine.history().is_empty());
        assert!(engine.progress().is_none());
        assert_eq!(engine.random_seed(), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = EvolutionEngine::new(Target::new("cat").unwrap(), config(Some(0), 1));
        assert!(matches!(result, Err(ConfigError::InvalidBudget)));
    }

    #[test]
    fn test_first_generation_is_random_pair() {
        let mut engine =
            EvolutionEngine::new(Target::new("cat").unwrap(), config(None, 9)).unwrap();
        engine.step();

        let (a, b) = engine.history().last_pair().unwrap();
        assert_eq!(a.text().len(), 3);
        assert_eq!(b.text().len(), 3);
        assert_eq!(engine.context().generation(), 1);

        let progress = engine.progress().unwrap();
        assert_eq!(progress.generation, 1);
        assert_eq!(
            progress.best.correctness,
            a.correctness().min(b.correctness())
        );
    }

    #[test]
    fn test_budget_run() {
        let mut engine =
            EvolutionEngine::new(Target::new("elephant").unwrap(), config(Some(5), 3)).unwrap();
        let result = engine.run();

        assert!(result.stats.generations <= 5);
        assert_eq!(result.trajectory.len(), result.stats.generations);
        assert_eq!(result.generations.len(), result.stats.generations);
        if result.stats.converged_at.is_none() {
            assert_eq!(result.stats.generations, 5);
            assert_eq!(result.stats.stop_reason, StopReason::BudgetExhausted);
            assert_eq!(engine.phase(), EvolutionPhase::BudgetExhausted);
        }
    }

    #[test]
    fn test_converges_on_short_word() {
        let mut engine =
            EvolutionEngine::new(Target::new("cat").unwrap(), config(Some(5000), 11)).unwrap();

        let mut reported = Vec::new();
        let result = engine.run_with_callback(|p| reported.push(p.generation));

        assert_eq!(result.stats.stop_reason, StopReason::Converged);
        assert_eq!(result.best.text, "cat");
        assert_eq!(result.stats.converged_at, Some(result.stats.generations));
        assert_eq!(reported, (1..=result.stats.generations).collect::<Vec<_>>());
        assert_eq!(engine.phase(), EvolutionPhase::Converged);
    }

    #[test]
    fn test_runs_to_budget_after_convergence() {
        let mut config = config(Some(3000), 11);
        config.termination.stop_on_convergence = false;
        config.trajectory = TrajectoryPolicy::Raw;
        let mut engine = EvolutionEngine::new(Target::new("cat").unwrap(), config).unwrap();

        let result = engine.run();
        assert_eq!(result.stats.generations, 3000);
        let converged_at = result.stats.converged_at.expect("should converge");
        assert_eq!(result.stats.stop_reason, StopReason::Converged);

        // Once matched, crossover keeps returning the match.
        assert!(
            result.trajectory[converged_at - 1..]
                .iter()
                .all(|c| c.correctness == 0)
        );
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut engine =
                EvolutionEngine::new(Target::new("moon").unwrap(), config(Some(50), seed))
                    .unwrap();
            engine.run().trajectory
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_rerun_starts_fresh() {
        let mut engine =
            EvolutionEngine::new(Target::new("moon").unwrap(), config(Some(10), 5)).unwrap();
        engine.run();
        let second = engine.run();

        assert!(second.stats.generations <= 10);
        assert_eq!(second.trajectory.len(), second.stats.generations);
        assert_eq!(second.generations[0].generation, 1);
    }
}
