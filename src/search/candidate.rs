//! Ranked opening candidates

use super::Objective;
use crate::opening::OpeningScore;
use serde::Serialize;
use std::cmp::Ordering;

/// A scored opening: sorted distinct corpus indices plus their exact score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningCandidate {
    pub guesses: Vec<usize>,
    pub score: OpeningScore,
}

impl OpeningCandidate {
    #[must_use]
    pub fn new(mut guesses: Vec<usize>, score: OpeningScore) -> Self {
        guesses.sort_unstable();
        Self { guesses, score }
    }

    /// Total order under `objective`: `Less` means `self` ranks first
    ///
    /// Equal scores fall back to the lexicographically smaller index tuple.
    #[must_use]
    pub fn rank(&self, other: &Self, objective: Objective) -> Ordering {
        let by_score = match objective {
            Objective::Entropy => self.score.cmp_entropy(&other.score),
            Objective::WorstCase => self.score.cmp_worst_case(&other.score),
        };
        by_score.then_with(|| self.guesses.cmp(&other.guesses))
    }
}

/// Best `capacity` candidates seen so far, kept sorted best first
#[derive(Debug, Clone)]
pub(crate) struct TopCandidates {
    objective: Objective,
    capacity: usize,
    items: Vec<OpeningCandidate>,
}

impl TopCandidates {
    pub(crate) fn new(objective: Objective, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            objective,
            capacity,
            items: Vec::with_capacity(capacity + 1),
        }
    }

    /// Insert `candidate` if it makes the cut; returns true if kept
    pub(crate) fn offer(&mut self, candidate: OpeningCandidate) -> bool {
        if self.is_full()
            && let Some(last) = self.items.last()
            && candidate.rank(last, self.objective) != Ordering::Less
        {
            return false;
        }

        match self
            .items
            .binary_search_by(|item| item.rank(&candidate, self.objective))
        {
            // Same tuple already present
            Ok(_) => false,
            Err(position) => {
                self.items.insert(position, candidate);
                self.items.truncate(self.capacity);
                true
            }
        }
    }

    /// Fold another list into this one
    pub(crate) fn merge(&mut self, other: Self) {
        for candidate in other.items {
            self.offer(candidate);
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Score a new candidate has to beat once the list is full
    pub(crate) fn threshold(&self) -> Option<&OpeningScore> {
        if self.is_full() {
            self.items.last().map(|item| &item.score)
        } else {
            None
        }
    }

    pub(crate) fn into_vec(self) -> Vec<OpeningCandidate> {
        self.items
    }
}
