//! Depth-first branch and bound over vehicle commitments.
//!
//! Each node commits one candidate (one vehicle, or a same-pack pair) that
//! carries the largest remaining pile. Branches share the pile arena and the
//! committed vehicle list; the only state crossing branches is the incumbent,
//! passed down by mutable reference.

mod candidates;

use std::rc::Rc;
use std::time::Instant;

use stackload_core::{BuiltVehicle, LaneGeometry, VehicleType, marginal_cost};

use crate::builder::build;
use crate::pool::{PileArena, PilePool};
use crate::stats::SearchStatistics;

use candidates::Candidate;

/// The deadline is only consulted on nodes whose count has these bits clear.
const TIME_CHECK_MASK: u64 = 0x3f;

/// Budget for one search.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SearchLimits {
    pub node_limit: Option<u64>,
    pub deadline: Option<Instant>,
}

/// What a search produced.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    /// Best complete packing in commit order, if one was found.
    pub vehicles: Option<Vec<BuiltVehicle>>,
    pub stats: SearchStatistics,
    /// `false` when the budget stopped the search early.
    pub exhaustive: bool,
}

/// Committed vehicles, newest first, sharing tails between branches.
#[derive(Debug, Clone, Default)]
struct VehicleList {
    head: Option<Rc<VehicleNode>>,
}

#[derive(Debug)]
struct VehicleNode {
    vehicle: BuiltVehicle,
    next: Option<Rc<VehicleNode>>,
}

impl VehicleList {
    fn push(&self, vehicle: BuiltVehicle) -> Self {
        Self {
            head: Some(Rc::new(VehicleNode {
                vehicle,
                next: self.head.clone(),
            })),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &BuiltVehicle> {
        std::iter::successors(self.head.as_deref(), |node| node.next.as_deref())
            .map(|node| &node.vehicle)
    }

    fn types(&self) -> impl Iterator<Item = &VehicleType> {
        self.iter().map(|vehicle| &vehicle.vehicle_type)
    }

    fn to_commit_order(&self) -> Vec<BuiltVehicle> {
        let mut vehicles: Vec<BuiltVehicle> = self.iter().cloned().collect();
        vehicles.reverse();
        vehicles
    }
}

#[derive(Debug)]
struct Incumbent {
    cost: f64,
    vehicles: Option<VehicleList>,
}

impl Default for Incumbent {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            vehicles: None,
        }
    }
}

struct Search<'a> {
    arena: &'a PileArena,
    types: &'a [VehicleType],
    lanes: LaneGeometry,
    limits: SearchLimits,
    vehicle_side_area: f64,
    cheapest_instance: f64,
    stats: SearchStatistics,
    truncated: bool,
}

/// Search for the cheapest complete loading of `arena` into `types`.
///
/// `types` must be non-empty and already filtered to vehicles wide enough
/// for `lanes`.
pub(crate) fn run(
    arena: &PileArena,
    types: &[VehicleType],
    lanes: LaneGeometry,
    limits: SearchLimits,
) -> SearchOutcome {
    let mut search = Search::new(arena, types, lanes, limits);
    let mut incumbent = Incumbent::default();
    search.explore(
        &PilePool::full(arena),
        &VehicleList::default(),
        0.0,
        0,
        &mut incumbent,
    );
    log::debug!("search finished: {}", search.stats);
    SearchOutcome {
        vehicles: incumbent.vehicles.map(|list| list.to_commit_order()),
        stats: search.stats,
        exhaustive: !search.truncated,
    }
}

impl<'a> Search<'a> {
    #[expect(clippy::float_arithmetic, reason = "side-view area of the largest deck")]
    fn new(
        arena: &'a PileArena,
        types: &'a [VehicleType],
        lanes: LaneGeometry,
        limits: SearchLimits,
    ) -> Self {
        let max_length = types.iter().map(|t| t.length).fold(0.0, f64::max);
        let max_height = types.iter().map(|t| t.height).fold(0.0, f64::max);
        let cheapest_instance = types
            .iter()
            .map(|t| t.cost_per_instance)
            .fold(f64::INFINITY, f64::min);
        Self {
            arena,
            types,
            lanes,
            limits,
            vehicle_side_area: 2.0 * max_length * max_height,
            cheapest_instance: if cheapest_instance.is_finite() {
                cheapest_instance
            } else {
                0.0
            },
            stats: SearchStatistics::default(),
            truncated: false,
        }
    }

    #[expect(clippy::float_arithmetic, reason = "branch cost accumulation")]
    fn explore(
        &mut self,
        pool: &PilePool,
        built: &VehicleList,
        cost: f64,
        depth: u64,
        incumbent: &mut Incumbent,
    ) {
        if pool.is_empty() {
            // A finished loading is kept even when the budget runs out on it.
            if self.budget_exhausted() {
                self.truncated = true;
            } else {
                self.stats.on_node_explored(depth);
            }
            if cost < incumbent.cost {
                log::debug!("improved loading at depth {depth}: cost {cost}");
                incumbent.cost = cost;
                incumbent.vehicles = Some(built.clone());
                self.stats.on_solution_found();
            }
            return;
        }

        if self.truncated || self.budget_exhausted() {
            self.truncated = true;
            return;
        }
        self.stats.on_node_explored(depth);

        if cost >= incumbent.cost || self.lower_bound(pool, cost) >= incumbent.cost {
            self.stats.on_pruning_bound();
            return;
        }

        let Some(required) = pool.largest(self.arena) else {
            return;
        };
        let options = candidates::generate(
            self.arena,
            pool,
            self.types,
            required,
            built.types(),
            self.lanes,
        );
        self.stats.on_candidates(options.len());
        if options.is_empty() {
            self.stats.on_pruning_infeasible();
            self.stats.on_backtrack();
            return;
        }

        for candidate in &options {
            if cost + candidate.marginal >= incumbent.cost {
                self.stats.on_pruning_bound();
                continue;
            }
            let (child_pool, child_built) = self.commit(pool, built, candidate);
            self.explore(
                &child_pool,
                &child_built,
                cost + candidate.marginal,
                depth.saturating_add(1),
                incumbent,
            );
            if self.truncated {
                return;
            }
        }
        self.stats.on_backtrack();
    }

    fn budget_exhausted(&self) -> bool {
        let nodes = self.stats.nodes_explored;
        if self.limits.node_limit.is_some_and(|limit| nodes >= limit) {
            return true;
        }
        nodes & TIME_CHECK_MASK == 0
            && self
                .limits
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Cost so far plus the cheapest price of the fewest vehicles whose decks
    /// could hold the remaining side-view area.
    ///
    /// Only admissible while packs have at most two members: later members of
    /// an open pack of three or more bill nothing, so this can prune the
    /// optimum for such catalogs.
    #[expect(clippy::float_arithmetic, reason = "area-based vehicle estimate")]
    fn lower_bound(&self, pool: &PilePool, cost: f64) -> f64 {
        if self.vehicle_side_area <= 0.0 {
            return cost;
        }
        let min_additional = (pool.side_area(self.arena) / self.vehicle_side_area).ceil();
        cost + min_additional * self.cheapest_instance
    }

    fn commit(
        &self,
        pool: &PilePool,
        built: &VehicleList,
        candidate: &Candidate,
    ) -> (PilePool, VehicleList) {
        let mut child_pool = pool.clone();
        let mut child_built = built.clone();
        for step in &candidate.steps {
            let Some(vehicle) = self.types.get(step.type_index) else {
                continue;
            };
            let billed = marginal_cost(child_built.types(), vehicle);
            let (committed, next_pool) = build(
                self.arena,
                &child_pool,
                vehicle,
                &step.packing,
                billed,
                self.lanes,
            );
            child_pool = next_pool;
            child_built = child_built.push(committed);
        }
        (child_pool, child_built)
    }
}

#[cfg(test)]
mod tests;
