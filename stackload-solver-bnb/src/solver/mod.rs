//! `BnbSolver`: the [`Solver`] implementation backed by the search.

use std::time::{Duration, Instant};

use stackload_core::{
    BillingStats, Diagnostics, LaneGeometry, SolveError, SolveRequest, SolveResponse, SolveStatus,
    Solver, VehicleType, consolidate_bundles, normalize_vehicle_types,
};

use crate::pool::PileArena;
use crate::search::{self, SearchLimits};

/// Configuration for [`BnbSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct BnbSolverConfig {
    /// Width of each of the two lanes.
    pub lane_width: f64,
    /// Stop after exploring this many search nodes.
    pub node_limit: Option<u64>,
    /// Stop once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
}

impl Default for BnbSolverConfig {
    fn default() -> Self {
        Self {
            lane_width: LaneGeometry::DEFAULT_LANE_WIDTH,
            node_limit: None,
            time_limit: None,
        }
    }
}

/// Branch-and-bound loading optimiser.
///
/// Without a budget the search runs until every branch is settled. With a
/// node or time limit it returns the best loading found so far and reports
/// `exhaustive: false` in the diagnostics.
///
/// # Examples
/// ```
/// use stackload_core::{BundleRow, SolveRequest, SolveStatus, Solver, VehicleRow};
/// use stackload_solver_bnb::BnbSolver;
///
/// let request = SolveRequest {
///     bundles: vec![BundleRow::new("A", 100.0, 30.0, 50.0)],
///     vehicles: vec![VehicleRow::new("T", "Trailer", 240.0, 96.0, 96.0, 500.0)],
/// };
/// let response = BnbSolver::new().solve(&request).expect("valid configuration");
/// assert_eq!(response.status, SolveStatus::Solved);
/// assert_eq!(response.stats.total_cost, 500.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BnbSolver {
    config: BnbSolverConfig,
}

impl BnbSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BnbSolverConfig::default())
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: BnbSolverConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &BnbSolverConfig {
        &self.config
    }

    fn limits(&self, started_at: Instant) -> SearchLimits {
        SearchLimits {
            node_limit: self.config.node_limit,
            deadline: self
                .config
                .time_limit
                .and_then(|limit| started_at.checked_add(limit)),
        }
    }
}

impl Solver for BnbSolver {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        let started_at = Instant::now();
        let lanes = LaneGeometry::new(self.config.lane_width)?;

        let piles = consolidate_bundles(&request.bundles, lanes);
        if piles.is_empty() {
            log::info!("nothing to pack");
            return Ok(unsolved(SolveStatus::NothingToPack, 0, started_at));
        }

        let types = usable_types(normalize_vehicle_types(&request.vehicles), lanes);
        if types.is_empty() {
            log::warn!("no usable vehicle types for {} pile(s)", piles.len());
            return Ok(unsolved(
                SolveStatus::NoVehicleTypes,
                piles.len(),
                started_at,
            ));
        }

        let longest = types.iter().map(|t| t.length).fold(0.0, f64::max);
        let oversized = piles.iter().filter(|pile| pile.length > longest).count();
        if oversized > 0 {
            log::warn!("{oversized} pile(s) are longer than every vehicle ({longest})");
            return Ok(unsolved(SolveStatus::OversizedPiles, oversized, started_at));
        }

        let arena = PileArena::new(piles);
        let outcome = search::run(&arena, &types, lanes, self.limits(started_at));
        let diagnostics = Diagnostics {
            solve_time: started_at.elapsed(),
            nodes_explored: outcome.stats.nodes_explored,
            solutions_found: outcome.stats.solutions_found,
            exhaustive: outcome.exhaustive,
        };

        let response = match outcome.vehicles {
            Some(vehicles) => SolveResponse {
                stats: BillingStats::from_vehicles(&vehicles, 0),
                vehicles,
                status: SolveStatus::Solved,
                diagnostics,
            },
            None => SolveResponse {
                vehicles: Vec::new(),
                stats: BillingStats::from_vehicles(&[], arena.len()),
                status: SolveStatus::NoPacking,
                diagnostics,
            },
        };
        log::info!(
            "solve finished: status={:?} vehicles={} cost={} nodes={} exhaustive={}",
            response.status,
            response.stats.vehicles_used,
            response.stats.total_cost,
            response.diagnostics.nodes_explored,
            response.diagnostics.exhaustive,
        );
        Ok(response)
    }
}

fn usable_types(types: Vec<VehicleType>, lanes: LaneGeometry) -> Vec<VehicleType> {
    types
        .into_iter()
        .filter(|vehicle| {
            let fits = vehicle.accommodates_lanes(lanes);
            if !fits {
                log::warn!(
                    "vehicle type {:?} is {} wide, narrower than two {} lanes; skipping",
                    vehicle.code,
                    vehicle.width,
                    lanes.lane_width()
                );
            }
            fits
        })
        .collect()
}

fn unsolved(status: SolveStatus, unplaced: usize, started_at: Instant) -> SolveResponse {
    SolveResponse {
        vehicles: Vec::new(),
        stats: BillingStats::from_vehicles(&[], unplaced),
        status,
        diagnostics: Diagnostics {
            solve_time: started_at.elapsed(),
            nodes_explored: 0,
            solutions_found: 0,
            exhaustive: true,
        },
    }
}
