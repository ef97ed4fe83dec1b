//! Configuration types for the word search.

use serde::{Deserialize, Serialize};

/// Letters a freshly random candidate is drawn from.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Top-level search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Symbols used when generating random candidates.
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Probability of attempting recombination instead of cloning the fitter parent.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Crossover attempts before falling back to a mutated clone.
    #[serde(default = "default_retries")]
    pub crossover_retries: usize,
    /// Random draws before the second parent degenerates into the first.
    #[serde(default = "default_retries")]
    pub pairing_retries: usize,
    /// Base tolerance of the compatibility gate.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Mutation settings.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// When the run stops.
    #[serde(default)]
    pub termination: TerminationConfig,
    /// How the best-so-far trajectory is updated.
    #[serde(default)]
    pub trajectory: TrajectoryPolicy,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            crossover_rate: default_crossover_rate(),
            crossover_retries: default_retries(),
            pairing_retries: default_retries(),
            tolerance: default_tolerance(),
            mutation: MutationConfig::default(),
            termination: TerminationConfig::default(),
            trajectory: TrajectoryPolicy::default(),
            random_seed: None,
        }
    }
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}
fn default_crossover_rate() -> f64 {
    0.8
}
fn default_retries() -> usize {
    1000
}
fn default_tolerance() -> f64 {
    0.01
}

/// Mutation operator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Relative weight of applying `i` point mutations, indexed by `i`.
    #[serde(default = "default_count_weights")]
    pub count_weights: Vec<f64>,
    /// Largest codepoint shift applied by a single point mutation.
    #[serde(default = "default_max_shift")]
    pub max_shift: u32,
    /// Candidates shorter than this are never mutated.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            count_weights: default_count_weights(),
            max_shift: default_max_shift(),
            min_length: default_min_length(),
        }
    }
}

fn default_count_weights() -> Vec<f64> {
    vec![0.4, 0.3, 0.2, 0.1]
}
fn default_max_shift() -> u32 {
    2
}
fn default_min_length() -> usize {
    4
}

/// Termination rule of the evolution loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationConfig {
    /// Generation budget. `None` runs until the target is matched.
    #[serde(default)]
    pub max_generations: Option<usize>,
    /// Stop on the first generation whose representative matches the target.
    /// When false the run continues until `max_generations`.
    #[serde(default = "default_stop_on_convergence")]
    pub stop_on_convergence: bool,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            max_generations: None,
            stop_on_convergence: default_stop_on_convergence(),
        }
    }
}

fn default_stop_on_convergence() -> bool {
    true
}

/// Update rule for the best-so-far trajectory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TrajectoryPolicy {
    /// Keep the previous best when a generation fails to improve on it.
    #[default]
    Monotonic,
    /// Always record the generation's representative, even if worse.
    Raw,
}

/// The word being searched for.
///
/// Only ASCII letters are accepted, so every character maps to a single
/// codepoint in the same range the random alphabet draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    chars: Vec<char>,
}

impl Target {
    /// Validate and wrap a target word.
    pub fn new(word: &str) -> Result<Self, ConfigError> {
        if word.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if let Some(bad) = word.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidTargetChar(bad));
        }
        Ok(Self {
            chars: word.chars().collect(),
        })
    }

    /// Characters of the word.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Required candidate length.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl TryFrom<String> for Target {
    type Error = ConfigError;

    fn try_from(word: String) -> Result<Self, Self::Error> {
        Self::new(&word)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.chars.into_iter().collect()
    }
}

impl SearchConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::InvalidRate(self.crossover_rate));
        }
        if self.crossover_retries == 0 || self.pairing_retries == 0 {
            return Err(ConfigError::InvalidRetries);
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }

        let weights = &self.mutation.count_weights;
        if weights.is_empty() || weights.iter().any(|w| w.is_nan() || *w < 0.0) {
            return Err(ConfigError::InvalidMutationWeights(format!("{weights:?}")));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidMutationWeights(
                "weights must not all be zero".to_string(),
            ));
        }

        match self.termination.max_generations {
            Some(0) => return Err(ConfigError::InvalidBudget),
            None if !self.termination.stop_on_convergence => {
                return Err(ConfigError::Unbounded);
            }
            _ => {}
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Target word must not be empty")]
    EmptyTarget,
    #[error("Target word may only contain ASCII letters, found {0:?}")]
    InvalidTargetChar(char),
    #[error("Generation budget must be a positive integer")]
    InvalidBudget,
    #[error("Alphabet must not be empty")]
    EmptyAlphabet,
    #[error("Crossover rate {0} is outside [0, 1]")]
    InvalidRate(f64),
    #[error("Retry counts must be positive")]
    InvalidRetries,
    #[error("Tolerance {0} must be non-negative")]
    InvalidTolerance(f64),
    #[error("Invalid mutation weights: {0}")]
    InvalidMutationWeights(String),
    #[error("A run without a generation budget must stop on convergence")]
    Unbounded,
}

/// Parse a generation budget given as text, rejecting zero and negatives.
pub fn parse_budget(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as usize),
        _ => Err(ConfigError::InvalidBudget),
    }
}
