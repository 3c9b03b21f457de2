//! Binary integer programs and the solver interface

use std::time::Instant;
use thiserror::Error;

/// Tolerance for "non-positive" pair terms
const PAIR_TOLERANCE: f64 = 1e-9;

/// Errors raised while building or solving a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("no assignment satisfies the constraints")]
    Infeasible,
    #[error("solver limits reached before any feasible assignment was found")]
    NoSolution,
    #[error("pair term ({i}, {j}) = {value} must not be positive")]
    PositivePairTerm { i: usize, j: usize, value: f64 },
    #[error("variable {index} is out of range for {variables} variables")]
    VariableOutOfRange { index: usize, variables: usize },
    #[error("solver returned an assignment that violates the program: {selected:?}")]
    InvalidAssignment { selected: Vec<usize> },
}

/// Maximize `Σ w_i x_i + Σ q_ij x_i x_j` over binary `x`
///
/// Subject to:
/// - exactly `cardinality` variables set
/// - at most one variable set in each `at_most_one` group
/// - for each excluded selection `E`: `Σ_{i ∈ E} x_i <= |E| - 1`
///
/// Pair terms are restricted to `q_ij <= 0`, so dropping them never lowers
/// the objective; solvers may rely on that for bounding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryProgram {
    weights: Vec<f64>,
    pair_terms: Vec<(usize, usize, f64)>,
    cardinality: usize,
    at_most_one: Vec<Vec<usize>>,
    excluded: Vec<Vec<usize>>,
}

impl BinaryProgram {
    /// Program over `weights.len()` variables selecting exactly `cardinality`
    #[must_use]
    pub fn new(weights: Vec<f64>, cardinality: usize) -> Self {
        Self {
            weights,
            cardinality,
            ..Self::default()
        }
    }

    /// Add `value * x_i * x_j`
    ///
    /// # Errors
    /// Returns `SolveError::PositivePairTerm` if `value > 0` and
    /// `SolveError::VariableOutOfRange` for an unknown variable.
    pub fn add_pair_term(&mut self, i: usize, j: usize, value: f64) -> Result<(), SolveError> {
        self.check(i)?;
        self.check(j)?;
        if value > PAIR_TOLERANCE {
            return Err(SolveError::PositivePairTerm { i, j, value });
        }
        if i != j && value < 0.0 {
            self.pair_terms.push((i.min(j), i.max(j), value));
        }
        Ok(())
    }

    /// Allow at most one variable of `group` to be set
    ///
    /// # Errors
    /// Returns `SolveError::VariableOutOfRange` for an unknown variable.
    pub fn add_at_most_one(&mut self, group: Vec<usize>) -> Result<(), SolveError> {
        for &index in &group {
            self.check(index)?;
        }
        if group.len() > 1 {
            self.at_most_one.push(group);
        }
        Ok(())
    }

    /// Forbid selecting every variable of `selection` at once
    ///
    /// # Errors
    /// Returns `SolveError::VariableOutOfRange` for an unknown variable.
    pub fn exclude(&mut self, mut selection: Vec<usize>) -> Result<(), SolveError> {
        for &index in &selection {
            self.check(index)?;
        }
        selection.sort_unstable();
        selection.dedup();
        self.excluded.push(selection);
        Ok(())
    }

    fn check(&self, index: usize) -> Result<(), SolveError> {
        if index < self.weights.len() {
            Ok(())
        } else {
            Err(SolveError::VariableOutOfRange {
                index,
                variables: self.weights.len(),
            })
        }
    }

    #[must_use]
    pub fn variables(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn pair_terms(&self) -> &[(usize, usize, f64)] {
        &self.pair_terms
    }

    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.cardinality
    }

    #[must_use]
    pub fn at_most_one(&self) -> &[Vec<usize>] {
        &self.at_most_one
    }

    #[must_use]
    pub fn excluded(&self) -> &[Vec<usize>] {
        &self.excluded
    }

    /// Objective value of a selection (sorted or not)
    #[must_use]
    pub fn objective(&self, selected: &[usize]) -> f64 {
        let linear: f64 = selected.iter().map(|&i| self.weights[i]).sum();
        let pairs: f64 = self
            .pair_terms
            .iter()
            .filter(|(i, j, _)| selected.contains(i) && selected.contains(j))
            .map(|(_, _, value)| value)
            .sum();
        linear + pairs
    }

    /// True if `selected` satisfies every constraint
    #[must_use]
    pub fn is_feasible(&self, selected: &[usize]) -> bool {
        let mut sorted = selected.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        sorted.len() == selected.len()
            && sorted.len() == self.cardinality
            && sorted.iter().all(|&i| i < self.weights.len())
            && self
                .at_most_one
                .iter()
                .all(|group| group.iter().filter(|i| sorted.contains(i)).count() <= 1)
            && self
                .excluded
                .iter()
                .all(|cut| !cut.iter().all(|i| sorted.binary_search(i).is_ok()))
    }
}

/// Solution returned by a solver
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Selected variables, ascending
    pub selected: Vec<usize>,
    pub objective: f64,
    /// True if the solver proved no better assignment exists
    pub proven_optimal: bool,
    /// Search nodes explored
    pub nodes: u64,
}

/// Resource limits for one solve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveLimits {
    pub max_nodes: Option<u64>,
    pub deadline: Option<Instant>,
}

/// Any discrete optimization back end able to solve a [`BinaryProgram`]
pub trait IntegerSolver {
    /// Find the best feasible assignment within `limits`
    ///
    /// # Errors
    /// `SolveError::Infeasible` when the constraints admit no assignment,
    /// `SolveError::NoSolution` when the limits ran out first.
    fn solve(&self, program: &BinaryProgram, limits: SolveLimits) -> Result<Assignment, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_pair_terms_rejected() {
        let mut program = BinaryProgram::new(vec![1.0, 2.0], 1);
        assert!(matches!(
            program.add_pair_term(0, 1, 0.5),
            Err(SolveError::PositivePairTerm { i: 0, j: 1, .. })
        ));
        assert!(program.add_pair_term(0, 1, -0.5).is_ok());
        assert!(program.add_pair_term(0, 1, 0.0).is_ok());
        assert_eq!(program.pair_terms(), &[(0, 1, -0.5)]);
    }

    #[test]
    fn unknown_variables_rejected() {
        let mut program = BinaryProgram::new(vec![1.0; 3], 2);
        assert!(matches!(
            program.add_at_most_one(vec![0, 3]),
            Err(SolveError::VariableOutOfRange { index: 3, variables: 3 })
        ));
        assert!(program.exclude(vec![5]).is_err());
    }

    #[test]
    fn objective_counts_pairs_once() {
        let mut program = BinaryProgram::new(vec![1.0, 2.0, 3.0], 2);
        program.add_pair_term(2, 1, -1.5).unwrap();
        assert!((program.objective(&[1, 2]) - 3.5).abs() < 1e-12);
        assert!((program.objective(&[0, 2]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn feasibility() {
        let mut program = BinaryProgram::new(vec![1.0; 4], 2);
        program.add_at_most_one(vec![0, 1]).unwrap();
        program.exclude(vec![2, 3]).unwrap();

        assert!(program.is_feasible(&[0, 2]));
        assert!(!program.is_feasible(&[0, 1]));
        assert!(!program.is_feasible(&[3, 2]));
        assert!(!program.is_feasible(&[0]));
        assert!(!program.is_feasible(&[0, 0]));
    }
}
