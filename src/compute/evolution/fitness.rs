//! Fitness function for the word search.
//!
//! A candidate is scored by its squared codepoint distance to the target,
//! summed over positions. Lower is better and 0 is an exact match.

use crate::schema::Target;

/// Scores candidate text against a fixed target.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    target: Target,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    /// The target being scored against.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Score candidate text against the target.
    pub fn evaluate(&self, text: &[char]) -> u64 {
        score(text, self.target.chars())
    }
}

/// Sum of squared codepoint differences over aligned positions.
///
/// Both slices must have the same length; `Candidate::scored` enforces this
/// for every candidate of a run.
pub fn score(text: &[char], target: &[char]) -> u64 {
    debug_assert_eq!(text.len(), target.len());
    text.iter()
        .zip(target)
        .map(|(&a, &b)| {
            let d = a as i64 - b as i64;
            (d * d) as u64
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_exact_match_scores_zero() {
        let evaluator = FitnessEvaluator::new(Target::new("cat").unwrap());
        assert_eq!(evaluator.evaluate(&chars("cat")), 0);
    }

    #[test]
    fn test_single_offset() {
        let evaluator = FitnessEvaluator::new(Target::new("cat").unwrap());
        assert_eq!(evaluator.evaluate(&chars("cau")), 1);
        assert_eq!(evaluator.evaluate(&chars("car")), 4);
    }

    #[test]
    fn test_distances_add_up() {
        // 'a'->'c' is 2, 'A'->'a' is 32.
        assert_eq!(score(&chars("aA"), &chars("ca")), 4 + 32 * 32);
    }

    #[test]
    fn test_symmetry() {
        let a = chars("Hello");
        let b = chars("world");
        assert_eq!(score(&a, &b), score(&b, &a));
    }
}
