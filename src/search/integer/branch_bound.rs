//! Built-in depth-first branch-and-bound solver
//!
//! Variables are visited by decreasing weight. At each node the bound is the
//! current objective plus the best weights still reachable, which is valid
//! because pair terms are never positive.

use super::program::{Assignment, BinaryProgram, IntegerSolver, SolveError, SolveLimits};
use std::time::Instant;

const TIE: f64 = 1e-12;

/// Exact solver for small [`BinaryProgram`]s
///
/// # Examples
/// ```
/// use wordle_openings::search::integer::{BinaryProgram, BranchAndBoundSolver, IntegerSolver, SolveLimits};
///
/// let mut program = BinaryProgram::new(vec![3.0, 2.5, 1.0], 2);
/// program.add_pair_term(0, 1, -2.0).unwrap();
///
/// let assignment = BranchAndBoundSolver.solve(&program, SolveLimits::default()).unwrap();
/// assert_eq!(assignment.selected, vec![0, 2]);
/// assert!(assignment.proven_optimal);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver;

impl IntegerSolver for BranchAndBoundSolver {
    fn solve(&self, program: &BinaryProgram, limits: SolveLimits) -> Result<Assignment, SolveError> {
        for &(i, j, value) in program.pair_terms() {
            if value > 0.0 {
                return Err(SolveError::PositivePairTerm { i, j, value });
            }
        }
        if program.cardinality() > program.variables() {
            return Err(SolveError::Infeasible);
        }

        let mut search = Search::new(program, limits);
        search.descend(0, 0.0);

        let proven_optimal = !search.stopped;
        match search.best {
            Some((objective, mut selected)) => {
                selected.sort_unstable();
                log::debug!(
                    "binary program solved: {} nodes, objective {objective:.4}{}",
                    search.nodes,
                    if proven_optimal { "" } else { " (limit reached)" }
                );
                Ok(Assignment {
                    selected,
                    objective,
                    proven_optimal,
                    nodes: search.nodes,
                })
            }
            None if search.stopped => Err(SolveError::NoSolution),
            None => Err(SolveError::Infeasible),
        }
    }
}

struct Search<'p> {
    program: &'p BinaryProgram,
    limits: SolveLimits,
    /// Variables by decreasing weight
    order: Vec<usize>,
    /// Running sums of the weights in `order`
    prefix_weights: Vec<f64>,
    /// Dense pair matrix, row-major
    pairs: Vec<f64>,
    /// Groups each variable belongs to
    groups_of: Vec<Vec<usize>>,
    group_used: Vec<bool>,
    chosen: Vec<usize>,
    best: Option<(f64, Vec<usize>)>,
    nodes: u64,
    stopped: bool,
}

impl<'p> Search<'p> {
    fn new(program: &'p BinaryProgram, limits: SolveLimits) -> Self {
        let n = program.variables();
        let weights = program.weights();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

        let mut prefix_weights = Vec::with_capacity(n + 1);
        prefix_weights.push(0.0);
        for &var in &order {
            let last = prefix_weights.last().copied().unwrap_or(0.0);
            prefix_weights.push(last + weights[var]);
        }

        let mut pairs = vec![0.0; n * n];
        for &(i, j, value) in program.pair_terms() {
            pairs[i * n + j] += value;
            pairs[j * n + i] += value;
        }

        let mut groups_of = vec![Vec::new(); n];
        for (group, members) in program.at_most_one().iter().enumerate() {
            for &var in members {
                groups_of[var].push(group);
            }
        }

        Self {
            program,
            limits,
            order,
            prefix_weights,
            pairs,
            groups_of,
            group_used: vec![false; program.at_most_one().len()],
            chosen: Vec::with_capacity(program.cardinality()),
            best: None,
            nodes: 0,
            stopped: false,
        }
    }

    fn out_of_limits(&self) -> bool {
        self.limits.max_nodes.is_some_and(|max| self.nodes >= max)
            || self.limits.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Best sum of `count` weights among `order[position..]`
    fn reachable(&self, position: usize, count: usize) -> f64 {
        self.prefix_weights[position + count] - self.prefix_weights[position]
    }

    fn descend(&mut self, position: usize, value: f64) {
        if self.stopped {
            return;
        }
        self.nodes += 1;
        if self.out_of_limits() {
            self.stopped = true;
            return;
        }

        let remaining = self.program.cardinality() - self.chosen.len();
        if remaining == 0 {
            self.offer(value);
            return;
        }
        if self.order.len() - position < remaining {
            return;
        }
        if let Some((best, _)) = &self.best
            && value + self.reachable(position, remaining) < best - TIE
        {
            return;
        }

        let var = self.order[position];

        // Take `var` if its groups are free
        if self.groups_of[var].iter().all(|&g| !self.group_used[g]) {
            let n = self.program.variables();
            let gain = self.program.weights()[var]
                + self
                    .chosen
                    .iter()
                    .map(|&other| self.pairs[var * n + other])
                    .sum::<f64>();

            for &g in &self.groups_of[var] {
                self.group_used[g] = true;
            }
            self.chosen.push(var);

            self.descend(position + 1, value + gain);

            self.chosen.pop();
            for &g in &self.groups_of[var] {
                self.group_used[g] = false;
            }
        }

        // Skip `var`
        self.descend(position + 1, value);
    }

    fn offer(&mut self, value: f64) {
        let mut selected = self.chosen.clone();
        selected.sort_unstable();

        let excluded = self
            .program
            .excluded()
            .iter()
            .any(|cut| cut.iter().all(|i| selected.binary_search(i).is_ok()));
        if excluded {
            return;
        }

        let better = match &self.best {
            None => true,
            Some((best, current)) => {
                value > best + TIE || ((value - best).abs() <= TIE && selected < *current)
            }
        };
        if better {
            self.best = Some((value, selected));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(program: &BinaryProgram) -> Option<(f64, Vec<usize>)> {
        let n = program.variables();
        let mut best: Option<(f64, Vec<usize>)> = None;
        for mask in 0u32..(1 << n) {
            let selected: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
            if !program.is_feasible(&selected) {
                continue;
            }
            let value = program.objective(&selected);
            let better = match &best {
                None => true,
                Some((b, s)) => value > b + TIE || ((value - b).abs() <= TIE && selected < *s),
            };
            if better {
                best = Some((value, selected));
            }
        }
        best
    }

    fn sample_program() -> BinaryProgram {
        let weights = vec![2.9, 2.7, 2.6, 2.2, 1.9, 1.4, 0.8, -0.3];
        let mut program = BinaryProgram::new(weights, 3);
        for (i, j, value) in [
            (0, 1, -1.8),
            (0, 2, -1.1),
            (1, 2, -0.4),
            (2, 3, -0.9),
            (3, 4, -0.2),
            (1, 5, -0.6),
            (4, 6, -0.1),
        ] {
            program.add_pair_term(i, j, value).unwrap();
        }
        program.add_at_most_one(vec![1, 3]).unwrap();
        program
    }

    #[test]
    fn matches_brute_force() {
        let program = sample_program();
        let assignment = BranchAndBoundSolver.solve(&program, SolveLimits::default()).unwrap();
        let (value, selected) = brute_force(&program).unwrap();
        assert_eq!(assignment.selected, selected);
        assert!((assignment.objective - value).abs() < 1e-9);
        assert!(assignment.proven_optimal);
    }

    #[test]
    fn exclusion_cuts_yield_next_best() {
        let mut program = sample_program();
        let mut seen = Vec::new();
        for _ in 0..5 {
            let assignment = BranchAndBoundSolver.solve(&program, SolveLimits::default()).unwrap();
            let (value, selected) = brute_force(&program).unwrap();
            assert_eq!(assignment.selected, selected);
            assert!((assignment.objective - value).abs() < 1e-9);
            assert!(!seen.contains(&assignment.selected));
            seen.push(assignment.selected.clone());
            program.exclude(assignment.selected).unwrap();
        }
    }

    #[test]
    fn infeasible_program() {
        let mut program = BinaryProgram::new(vec![1.0, 1.0, 1.0], 2);
        program.add_at_most_one(vec![0, 1, 2]).unwrap();
        assert_eq!(
            BranchAndBoundSolver.solve(&program, SolveLimits::default()),
            Err(SolveError::Infeasible)
        );

        let too_many = BinaryProgram::new(vec![1.0], 2);
        assert_eq!(
            BranchAndBoundSolver.solve(&too_many, SolveLimits::default()),
            Err(SolveError::Infeasible)
        );
    }

    #[test]
    fn node_limit_stops_early() {
        let program = sample_program();
        let limits = SolveLimits {
            max_nodes: Some(1),
            deadline: None,
        };
        assert_eq!(
            BranchAndBoundSolver.solve(&program, limits),
            Err(SolveError::NoSolution)
        );

        let limits = SolveLimits {
            max_nodes: Some(6),
            deadline: None,
        };
        let assignment = BranchAndBoundSolver.solve(&program, limits).unwrap();
        assert!(!assignment.proven_optimal);
        assert!(program.is_feasible(&assignment.selected));
    }
}
