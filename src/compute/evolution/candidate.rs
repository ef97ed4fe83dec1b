//! Scored candidates and the per-run context they are built against.

use std::fmt;

use crate::schema::{CandidateSnapshot, ConfigError, SearchConfig, Target};

use super::fitness::FitnessEvaluator;
use super::genome::{MutationOperator, TextRng};

/// Read-only state of a run, threaded through every operator call.
#[derive(Debug, Clone)]
pub struct RunContext {
    evaluator: FitnessEvaluator,
    mutation: MutationOperator,
    alphabet: Vec<char>,
    max_generations: Option<usize>,
    generation: usize,
}

impl RunContext {
    /// Build a context for `target`, rejecting an invalid configuration.
    pub fn new(target: Target, config: &SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            evaluator: FitnessEvaluator::new(target),
            mutation: MutationOperator::new(&config.mutation)?,
            alphabet: config.alphabet.chars().collect(),
            max_generations: config.termination.max_generations,
            generation: 0,
        })
    }

    pub fn target(&self) -> &Target {
        self.evaluator.target()
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Generation budget, if any.
    pub fn max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    /// Generation currently being produced (1-based; 0 before the first).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Move to the given generation index.
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }
}

/// A scored guess. Immutable once built; `correctness` is always the score
/// of `text` against the run's target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    text: Vec<char>,
    correctness: u64,
}

impl Candidate {
    /// Score `text` as-is.
    ///
    /// # Panics
    ///
    /// Panics if `text` is not as long as the target.
    pub fn scored(text: Vec<char>, ctx: &RunContext) -> Self {
        assert_eq!(
            text.len(),
            ctx.target().len(),
            "candidate length must match the target"
        );
        let correctness = ctx.evaluator.evaluate(&text);
        Self { text, correctness }
    }

    /// Fresh candidate drawn uniformly from the alphabet.
    pub fn random(ctx: &RunContext, rng: &mut TextRng) -> Self {
        let text = rng.random_text(&ctx.alphabet, ctx.target().len());
        Self::scored(text, ctx)
    }

    /// Mutated copy of `seed`.
    pub fn derived(seed: &[char], ctx: &RunContext, rng: &mut TextRng) -> Self {
        let text = ctx.mutation.mutate(seed, rng);
        Self::scored(text, ctx)
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// Distance to the target; 0 is an exact match.
    pub fn correctness(&self) -> u64 {
        self.correctness
    }

    pub fn is_optimal(&self) -> bool {
        self.correctness == 0
    }

    /// The fitter of two candidates; ties go to `b`.
    pub fn fitter<'a>(a: &'a Candidate, b: &'a Candidate) -> &'a Candidate {
        if a.correctness < b.correctness { a } else { b }
    }

    /// Convert to snapshot for serialization.
    pub fn to_snapshot(&self) -> CandidateSnapshot {
        CandidateSnapshot {
            text: self.to_string(),
            correctness: self.correctness,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(word: &str) -> RunContext {
        RunContext::new(Target::new(word).unwrap(), &SearchConfig::default()).unwrap()
    }

    #[test]
    fn test_random_candidate() {
        let ctx = context("elephant");
        let mut rng = TextRng::new(42);

        for _ in 0..50 {
            let candidate = Candidate::random(&ctx, &mut rng);
            assert_eq!(candidate.text().len(), 8);
            assert!(candidate.text().iter().all(|c| c.is_ascii_alphabetic()));
            assert_eq!(
                candidate.correctness(),
                ctx.evaluator().evaluate(candidate.text())
            );
        }
    }

    #[test]
    fn test_derived_candidate_keeps_length() {
        let ctx = context("elephant");
        let mut rng = TextRng::new(42);
        let seed: Vec<char> = "elephant".chars().collect();

        for _ in 0..50 {
            let candidate = Candidate::derived(&seed, &ctx, &mut rng);
            assert_eq!(candidate.text().len(), seed.len());
        }
    }

    #[test]
    fn test_scored() {
        let ctx = context("cat");
        let exact = Candidate::scored("cat".chars().collect(), &ctx);
        assert!(exact.is_optimal());
        assert_eq!(exact.to_string(), "cat");

        let near = Candidate::scored("cau".chars().collect(), &ctx);
        assert_eq!(near.correctness(), 1);
        assert_eq!(
            near.to_snapshot(),
            CandidateSnapshot {
                text: "cau".to_string(),
                correctness: 1
            }
        );
    }

    #[test]
    #[should_panic(expected = "candidate length must match the target")]
    fn test_scored_rejects_wrong_length() {
        let ctx = context("cat");
        Candidate::scored("ca".chars().collect(), &ctx);
    }

    #[test]
    fn test_context_rejects_invalid_config() {
        let config = SearchConfig {
            alphabet: String::new(),
            ..Default::default()
        };
        let result = RunContext::new(Target::new("cat").unwrap(), &config);
        assert!(matches!(result, Err(ConfigError::EmptyAlphabet)));
    }

    #[test]
    fn test_fitter_prefers_second_on_tie() {
        let ctx = context("cat");
        let a = Candidate::scored("cau".chars().collect(), &ctx);
        let b = Candidate::scored("cas".chars().collect(), &ctx);
        assert_eq!(a.correctness(), b.correctness());
        assert_eq!(Candidate::fitter(&a, &b), &b);

        let exact = Candidate::scored("cat".chars().collect(), &ctx);
        assert_eq!(Candidate::fitter(&exact, &a), &exact);
    }
}
