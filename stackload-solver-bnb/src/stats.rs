//! Counters collected while searching.

use std::fmt;

/// Branch-and-bound search counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Nodes entered.
    pub nodes_explored: u64,
    /// Nodes left without descending further.
    pub backtracks: u64,
    /// Candidates considered across all nodes.
    pub candidates_generated: u64,
    /// Branches cut because their cost could not beat the incumbent.
    pub prunings_bound: u64,
    /// Nodes with no vehicle able to take the required pile.
    pub prunings_infeasible: u64,
    /// Complete packings that improved on the incumbent.
    pub solutions_found: u64,
    /// Deepest node reached; the root is depth zero.
    pub max_depth: u64,
}

impl SearchStatistics {
    pub(crate) const fn on_node_explored(&mut self, depth: u64) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        if depth > self.max_depth {
            self.max_depth = depth;
        }
    }

    pub(crate) const fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    pub(crate) fn on_candidates(&mut self, count: usize) {
        let added = u64::try_from(count).unwrap_or(u64::MAX);
        self.candidates_generated = self.candidates_generated.saturating_add(added);
    }

    pub(crate) const fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    pub(crate) const fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    pub(crate) const fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} backtracks={} candidates={} pruned_bound={} pruned_infeasible={} \
             solutions={} max_depth={}",
            self.nodes_explored,
            self.backtracks,
            self.candidates_generated,
            self.prunings_bound,
            self.prunings_infeasible,
            self.solutions_found,
            self.max_depth,
        )
    }
}
