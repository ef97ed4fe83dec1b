//! Generation history: parent pairs and the best-so-far trajectory.

use std::fs;
use std::io;
use std::path::Path;

use crate::schema::{CandidateSnapshot, EvolutionResult, GenerationSnapshot, TrajectoryPolicy};

use super::candidate::Candidate;

/// Append-only record of a single run.
#[derive(Debug, Clone)]
pub struct GenerationHistory {
    /// Parent pairs in generation order.
    pairs: Vec<(Candidate, Candidate)>,
    /// Best-so-far candidate per generation.
    trajectory: Vec<Candidate>,
    policy: TrajectoryPolicy,
}

impl GenerationHistory {
    /// Create an empty history.
    pub fn new(policy: TrajectoryPolicy) -> Self {
        Self {
            pairs: Vec::new(),
            trajectory: Vec::new(),
            policy,
        }
    }

    /// Record a generation's pair and update the trajectory.
    ///
    /// Returns the trajectory entry recorded for this generation.
    pub fn record(&mut self, a: Candidate, b: Candidate) -> &Candidate {
        let representative = Candidate::fitter(&a, &b).clone();

        let entry = match (self.policy, self.trajectory.last()) {
            (TrajectoryPolicy::Monotonic, Some(previous))
                if representative.correctness() >= previous.correctness() =>
            {
                previous.clone()
            }
            _ => representative,
        };

        self.pairs.push((a, b));
        self.trajectory.push(entry);
        &self.trajectory[self.trajectory.len() - 1]
    }

    /// Pair produced by the latest generation.
    pub fn last_pair(&self) -> Option<&(Candidate, Candidate)> {
        self.pairs.last()
    }

    /// Latest trajectory entry.
    pub fn current(&self) -> Option<&Candidate> {
        self.trajectory.last()
    }

    /// Lowest-correctness entry of the whole trajectory; the latest wins ties.
    pub fn best(&self) -> Option<&Candidate> {
        self.trajectory
            .iter()
            .rev()
            .min_by_key(|c| c.correctness())
    }

    pub fn pairs(&self) -> &[(Candidate, Candidate)] {
        &self.pairs
    }

    pub fn trajectory(&self) -> &[Candidate] {
        &self.trajectory
    }

    /// Number of generations recorded.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Trajectory as snapshots.
    pub fn trajectory_snapshots(&self) -> Vec<CandidateSnapshot> {
        self.trajectory.iter().map(Candidate::to_snapshot).collect()
    }

    /// Pairs as snapshots with 1-based generation numbers.
    pub fn generation_snapshots(&self) -> Vec<GenerationSnapshot> {
        self.pairs
            .iter()
            .enumerate()
            .map(|(i, (a, b))| GenerationSnapshot {
                generation: i + 1,
                parent_a: a.to_snapshot(),
                parent_b: b.to_snapshot(),
            })
            .collect()
    }
}

/// Render a trajectory as a plain-text table.
pub fn render_table(trajectory: &[CandidateSnapshot]) -> String {
    const HEADERS: [&str; 3] = ["Generation", "Best Guess", "Cost Value"];

    let rows: Vec<[String; 3]> = trajectory
        .iter()
        .enumerate()
        .map(|(i, c)| {
            [
                (i + 1).to_string(),
                c.text.clone(),
                c.correctness.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    // Numbers right-aligned, text left-aligned.
    let line = |cells: [&str; 3]| {
        format!(
            "{:>w0$}  {:<w1$}  {:>w2$}\n",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )
    };

    let mut out = line(HEADERS);
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2])
    ));
    for row in &rows {
        out.push_str(&line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
    }
    out
}

/// Write a run result as pretty JSON.
pub fn save_result<P: AsRef<Path>>(result: &EvolutionResult, path: P) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)
}

/// Load a run result written by [`save_result`].
pub fn load_result<P: AsRef<Path>>(path: P) -> io::Result<EvolutionResult> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
