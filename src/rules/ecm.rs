//! Anti-ECM hit probability
//!
//! One-time weapons (rockets, bombs) can be jammed. The chance that they
//! connect depends on the firing side's anti-ECM rating against the target's
//! ECM rating, looked up in a per-difficulty matrix.

use serde::{Deserialize, Serialize};

use crate::core::types::Difficulty;

/// Probability matrix indexed `[anti_ecm_level][ecm_level]`
pub type EcmMatrix = Vec<Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntiEcmTable {
    /// Used for every difficulty without its own matrix
    pub default: EcmMatrix,
    pub overrides: Vec<(Difficulty, EcmMatrix)>,
}

impl Default for AntiEcmTable {
    fn default() -> Self {
        Self {
            default: vec![
                vec![1.0, 0.5, 0.25],
                vec![1.0, 0.8, 0.5],
                vec![1.0, 0.9, 0.75],
                vec![1.0, 1.0, 0.9],
            ],
            overrides: Vec::new(),
        }
    }
}

impl AntiEcmTable {
    pub fn matrix(&self, difficulty: Difficulty) -> &EcmMatrix {
        self.overrides
            .iter()
            .find(|(d, _)| *d == difficulty)
            .map(|(_, m)| m)
            .unwrap_or(&self.default)
    }

    /// Chance that a one-time attack hits, in [0, 1]
    ///
    /// Average ratings are rounded to the nearest level and clamped to the
    /// matrix bounds. An empty matrix means nothing is ever jammed.
    pub fn probability(&self, difficulty: Difficulty, anti_ecm: f64, ecm: f64) -> f64 {
        let matrix = self.matrix(difficulty);
        if matrix.is_empty() {
            return 1.0;
        }
        let row = &matrix[level(anti_ecm, matrix.len())];
        if row.is_empty() {
            return 1.0;
        }
        row[level(ecm, row.len())].clamp(0.0, 1.0)
    }
}

fn level(average: f64, len: usize) -> usize {
    if !average.is_finite() || average <= 0.0 {
        return 0;
    }
    (average.round() as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ecm_always_hits() {
        let table = AntiEcmTable::default();
        assert_eq!(table.probability(Difficulty::Normal, 0.0, 0.0), 1.0);
        assert_eq!(table.probability(Difficulty::Normal, 2.0, 0.0), 1.0);
    }

    #[test]
    fn test_ecm_jams_without_anti_ecm() {
        let table = AntiEcmTable::default();
        assert_eq!(table.probability(Difficulty::Normal, 0.0, 1.0), 0.5);
        assert_eq!(table.probability(Difficulty::Normal, 0.0, 2.0), 0.25);
    }

    #[test]
    fn test_levels_round_and_clamp() {
        let table = AntiEcmTable::default();
        // 1.4 rounds to 1, 9.0 clamps to the last row
        assert_eq!(table.probability(Difficulty::Normal, 1.4, 1.0), 0.8);
        assert_eq!(table.probability(Difficulty::Normal, 9.0, 7.0), 0.9);
    }

    #[test]
    fn test_difficulty_override() {
        let table = AntiEcmTable {
            overrides: vec![(Difficulty::Hard, vec![vec![0.1, 0.1]])],
            ..Default::default()
        };
        assert_eq!(table.probability(Difficulty::Hard, 3.0, 0.0), 0.1);
        assert_eq!(table.probability(Difficulty::Easy, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_empty_matrix_never_jams() {
        let table = AntiEcmTable { default: vec![], overrides: vec![] };
        assert_eq!(table.probability(Difficulty::Normal, 1.0, 1.0), 1.0);
    }
}
