//! Pairing operators: k-point crossover with retry, and the compatibility
//! gate that admits a second parent.
//!
//! Neither operator can fail. Running out of retries is reported as an
//! outcome variant and resolved by a fallback the caller can observe.

use log::debug;
use rand::distributions::WeightedIndex;

use crate::schema::{ConfigError, SearchConfig};

use super::candidate::{Candidate, RunContext};
use super::genome::{TextRng, exchange_suffixes, point_count_distribution};

/// How the crossover operator produced its candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossoverOutcome {
    /// A parent already matched the target and was returned unchanged.
    Exploited(Candidate),
    /// Recombination was skipped; mutated copy of the fitter parent.
    Cloned(Candidate),
    /// An offspring improved on both parents.
    Recombined {
        offspring: Candidate,
        attempts: usize,
    },
    /// No attempt improved; mutated copy of the fitter parent.
    Exhausted(Candidate),
}

impl CrossoverOutcome {
    pub fn into_candidate(self) -> Candidate {
        match self {
            Self::Exploited(c) | Self::Cloned(c) | Self::Exhausted(c) => c,
            Self::Recombined { offspring, .. } => offspring,
        }
    }

    /// True when every crossover attempt failed to improve.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }
}

/// Recombines the previous generation's pair into the next first parent.
#[derive(Debug, Clone)]
pub struct CrossoverOperator {
    rate: f64,
    retries: usize,
    points: WeightedIndex<f64>,
}

impl CrossoverOperator {
    /// Create for candidates of length `len`.
    pub fn new(config: &SearchConfig, len: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            rate: config.crossover_rate,
            retries: config.crossover_retries,
            points: point_count_distribution(len)?,
        })
    }

    /// Produce one candidate from two parents.
    pub fn crossover(
        &self,
        a: &Candidate,
        b: &Candidate,
        ctx: &RunContext,
        rng: &mut TextRng,
    ) -> CrossoverOutcome {
        if a.is_optimal() {
            return CrossoverOutcome::Exploited(a.clone());
        }
        if b.is_optimal() {
            return CrossoverOutcome::Exploited(b.clone());
        }

        let fitter = Candidate::fitter(a, b);
        if !rng.chance(self.rate) {
            return CrossoverOutcome::Cloned(Candidate::derived(fitter.text(), ctx, rng));
        }

        // Working strings carry over between attempts, so each retry cuts
        // the previous attempt's exchange further.
        let mut left = a.text().to_vec();
        let mut right = b.text().to_vec();

        for attempt in 1..=self.retries {
            let segments = rng.weighted(&self.points) + 1;
            exchange_suffixes(&mut left, &mut right, segments);

            let first = Candidate::derived(&left, ctx, rng);
            let second = Candidate::derived(&right, ctx, rng);
            let best = Candidate::fitter(&first, &second);

            if best.correctness() < fitter.correctness() {
                return CrossoverOutcome::Recombined {
                    offspring: best.clone(),
                    attempts: attempt,
                };
            }
        }

        debug!(
            "generation {}: no improving crossover in {} attempts, cloning {}",
            ctx.generation(),
            self.retries,
            fitter
        );
        CrossoverOutcome::Exhausted(Candidate::derived(fitter.text(), ctx, rng))
    }
}

/// How the second parent of a generation was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingOutcome {
    /// A random candidate passed the gate after `draws` draws.
    Compatible { partner: Candidate, draws: usize },
    /// Nothing passed; the first parent is paired with itself.
    Degenerate,
}

/// Decides whether two candidates may form a mating pair.
///
/// The admissible fitness gap shrinks as the run ages: early generations
/// accept a wide gap, later ones require near parity.
#[derive(Debug, Clone)]
pub struct CompatibilityGate {
    tolerance: f64,
    retries: usize,
}

impl CompatibilityGate {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            retries: config.pairing_retries,
        }
    }

    /// Tolerance multiplier for the current generation.
    ///
    /// With a budget `n` it decays linearly, `tolerance * (n - g) / (2n)`;
    /// without one it decays as `tolerance / g`.
    pub fn tolerance_factor(&self, ctx: &RunContext) -> f64 {
        let generation = ctx.generation().max(1);
        match ctx.max_generations() {
            Some(budget) if budget > 0 => {
                let remaining = budget.saturating_sub(generation) as f64;
                self.tolerance * remaining / (budget as f64 * 2.0)
            }
            _ => self.tolerance / generation as f64,
        }
    }

    /// Whether `candidate` may pair with `anchor`.
    ///
    /// Two exact matches are always compatible. Otherwise `candidate` must be
    /// strictly better than `anchor - 1 + anchor * factor`.
    pub fn is_compatible(
        &self,
        candidate: &Candidate,
        anchor: &Candidate,
        ctx: &RunContext,
    ) -> bool {
        if candidate.is_optimal() && anchor.is_optimal() {
            return true;
        }

        let anchor_score = anchor.correctness() as f64;
        let limit = anchor_score - 1.0 + anchor_score * self.tolerance_factor(ctx);
        (candidate.correctness() as f64) < limit
    }

    /// Draw random candidates until one is compatible with `anchor`.
    pub fn select_partner(
        &self,
        anchor: &Candidate,
        ctx: &RunContext,
        rng: &mut TextRng,
    ) -> PairingOutcome {
        for draw in 1..=self.retries {
            let partner = Candidate::random(ctx, rng);
            if self.is_compatible(&partner, anchor, ctx) {
                return PairingOutcome::Compatible {
                    partner,
                    draws: draw,
                };
            }
        }

        debug!(
            "generation {}: no compatible partner for {} in {} draws",
            ctx.generation(),
            anchor,
            self.retries
        );
        PairingOutcome::Degenerate
    }
}
