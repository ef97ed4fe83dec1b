//! Text manipulation utilities for evolutionary search.
//!
//! Provides random generation, point mutation, and k-point suffix exchange
//! over candidate text.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::schema::{ConfigError, MutationConfig};

/// Random number generator wrapper for text operations.
///
/// Every random draw of a run goes through one instance, so a fixed seed
/// replays the whole run.
pub struct TextRng {
    rng: StdRng,
}

impl TextRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `len` characters drawn uniformly from `alphabet`.
    pub fn random_text(&mut self, alphabet: &[char], len: usize) -> Vec<char> {
        (0..len)
            .filter_map(|_| alphabet.choose(&mut self.rng).copied())
            .collect()
    }

    /// Bernoulli draw; `p` must lie in `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    /// Uniform index in `[0, len)`.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Uniform codepoint shift in `[-max, max]`.
    pub fn shift(&mut self, max: u32) -> i64 {
        let max = max as i64;
        self.rng.gen_range(-max..=max)
    }

    /// Draw an index from a weighted distribution.
    pub fn weighted(&mut self, dist: &WeightedIndex<f64>) -> usize {
        self.rng.sample(dist)
    }
}

/// Point mutation over candidate text.
///
/// Draws a mutation count `k` from the configured weights, then shifts the
/// codepoint of `k` uniformly chosen positions (repeats allowed) by a small
/// uniform amount. Shifted codepoints are not clamped to the alphabet.
#[derive(Debug, Clone)]
pub struct MutationOperator {
    counts: WeightedIndex<f64>,
    max_shift: u32,
    min_length: usize,
}

impl MutationOperator {
    /// Build from configuration.
    pub fn new(config: &MutationConfig) -> Result<Self, ConfigError> {
        let counts = WeightedIndex::new(&config.count_weights)
            .map_err(|e| ConfigError::InvalidMutationWeights(e.to_string()))?;
        Ok(Self {
            counts,
            max_shift: config.max_shift,
            min_length: config.min_length,
        })
    }

    /// Return a mutated copy of `text`.
    pub fn mutate(&self, text: &[char], rng: &mut TextRng) -> Vec<char> {
        let count = rng.weighted(&self.counts);
        let mut mutated = text.to_vec();

        // Short words are left alone.
        if count == 0 || text.is_empty() || text.len() < self.min_length {
            return mutated;
        }

        for _ in 0..count {
            let i = rng.index(mutated.len());
            let d = rng.shift(self.max_shift);
            mutated[i] = shift_char(mutated[i], d);
        }

        mutated
    }
}

/// Shift a character's codepoint by `d`.
///
/// A shift landing outside the Unicode scalar range (negative, a surrogate,
/// or past U+10FFFF) leaves the character unchanged.
pub fn shift_char(c: char, d: i64) -> char {
    u32::try_from(c as i64 + d)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(c)
}

/// Weighted distribution over crossover point counts `1..=len`.
///
/// Count `k` has weight `1/k`, so fewer cut points are favoured.
pub fn point_count_distribution(len: usize) -> Result<WeightedIndex<f64>, ConfigError> {
    WeightedIndex::new((1..=len).map(|k| 1.0 / k as f64)).map_err(|_| ConfigError::EmptyTarget)
}

/// Cut positions splitting `[0, len)` into `segments` runs of width
/// `len / segments`, the last run absorbing any remainder.
pub fn cut_points(len: usize, segments: usize) -> impl Iterator<Item = usize> {
    let width = if segments == 0 { 0 } else { len / segments };
    (1..segments).map(move |j| j * width).filter(move |&i| i > 0 && i < len)
}

/// Multi-point crossover by sequential suffix exchange.
///
/// At every cut point the suffixes of `a` and `b` are swapped, so segments
/// alternate between the two parents.
pub fn exchange_suffixes(a: &mut [char], b: &mut [char], segments: usize) {
    debug_assert_eq!(a.len(), b.len());
    for i in cut_points(a.len(), segments) {
        a[i..].swap_with_slice(&mut b[i..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_random_text() {
        let mut rng = TextRng::new(42);
        let alphabet = chars("ab");

        let text = rng.random_text(&alphabet, 16);
        assert_eq!(text.len(), 16);
        assert!(text.iter().all(|c| alphabet.contains(c)));
    }

    #[test]
    fn test_short_text_is_stable() {
        let mut rng = TextRng::new(42);
        let mutation = MutationOperator::new(&MutationConfig {
            // Always draw three mutations.
            count_weights: vec![0.0, 0.0, 0.0, 1.0],
            ..Default::default()
        })
        .unwrap();

        let text = chars("cat");
        for _ in 0..100 {
            assert_eq!(mutation.mutate(&text, &mut rng), text);
        }
    }

    #[test]
    fn test_mutation_shifts_are_bounded() {
        let mut rng = TextRng::new(7);
        let mutation = MutationOperator::new(&MutationConfig {
            count_weights: vec![0.0, 1.0],
            ..Default::default()
        })
        .unwrap();

        let text = chars("mmmmmmmm");
        for _ in 0..200 {
            let mutated = mutation.mutate(&text, &mut rng);
            assert_eq!(mutated.len(), text.len());
            let changed: Vec<_> = mutated
                .iter()
                .zip(&text)
                .filter(|(a, b)| a != b)
                .collect();
            // One point mutation touches at most one position.
            assert!(changed.len() <= 1);
            for (&a, &b) in changed {
                assert!((a as i64 - b as i64).abs() <= 2);
            }
        }
    }

    #[test]
    fn test_zero_count_is_identity() {
        let mut rng = TextRng::new(1);
        let mutation = MutationOperator::new(&MutationConfig {
            count_weights: vec![1.0],
            ..Default::default()
        })
        .unwrap();

        let text = chars("elephant");
        assert_eq!(mutation.mutate(&text, &mut rng), text);
    }

    #[test]
    fn test_mutation_count_weights() {
        let mutation = MutationOperator::new(&MutationConfig::default()).unwrap();
        let mut rng = TextRng::new(11);
        let mut hist = [0usize; 4];
        for _ in 0..10_000 {
            hist[rng.weighted(&mutation.counts)] += 1;
        }
        // Expected 4000 / 3000 / 2000 / 1000.
        for (count, expected) in hist.iter().zip([4000, 3000, 2000, 1000]) {
            assert!(count.abs_diff(expected) < 300, "{hist:?}");
        }
    }

    #[test]
    fn test_shift_char() {
        assert_eq!(shift_char('b', 1), 'c');
        assert_eq!(shift_char('b', -2), '`');
        assert_eq!(shift_char('\0', -1), '\0');
        assert_eq!(shift_char('\u{D7FF}', 1), '\u{D7FF}');
    }

    #[test]
    fn test_cut_points() {
        assert_eq!(cut_points(6, 1).count(), 0);
        assert_eq!(cut_points(6, 2).collect::<Vec<_>>(), vec![3]);
        assert_eq!(cut_points(6, 3).collect::<Vec<_>>(), vec![2, 4]);
        // Remainder goes to the last segment.
        assert_eq!(cut_points(7, 3).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(cut_points(3, 3).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_exchange_suffixes() {
        let mut a = chars("aaaaaa");
        let mut b = chars("bbbbbb");

        exchange_suffixes(&mut a, &mut b, 3);
        assert_eq!(a, chars("aabbaa"));
        assert_eq!(b, chars("bbaabb"));

        let mut a = chars("aaaa");
        let mut b = chars("bbbb");
        exchange_suffixes(&mut a, &mut b, 1);
        assert_eq!(a, chars("aaaa"));
    }

    #[test]
    fn test_point_count_distribution() {
        let dist = point_count_distribution(5).unwrap();
        let mut rng = TextRng::new(3);
        let mut hist = [0usize; 5];
        for _ in 0..10_000 {
            hist[rng.weighted(&dist)] += 1;
        }
        // Weights 1, 1/2, 1/3, ... so one cut segment dominates.
        assert!(hist[0] > hist[1]);
        assert!(hist[1] > hist[4]);

        assert!(point_count_distribution(0).is_err());
    }
}
