//! The solver seam: requests, responses and the [`Solver`] trait.

use std::time::Duration;

use thiserror::Error;

use crate::{BillingStats, BuiltVehicle, BundleRow, LaneGeometryError, VehicleRow};

/// Raw inputs for one solve.
///
/// # Examples
/// ```rust
/// use stackload_core::{BundleRow, SolveRequest, VehicleRow};
///
/// let request = SolveRequest {
///     bundles: vec![BundleRow::new("A", 100.0, 30.0, 50.0)],
///     vehicles: vec![VehicleRow::new("T", "Trailer", 240.0, 96.0, 96.0, 500.0)],
/// };
/// assert_eq!(request.bundles.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SolveRequest {
    /// Cargo rows before consolidation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bundles: Vec<BundleRow>,
    /// Vehicle catalog rows before normalisation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicles: Vec<VehicleRow>,
}

/// How a solve ended.
///
/// The variants keep "some piles cannot fit any vehicle" apart from "the
/// search found no complete packing" so callers can word them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolveStatus {
    /// Every pile was loaded.
    Solved,
    /// No pile had a usable length and height.
    NothingToPack,
    /// No usable vehicle type remained after normalisation.
    NoVehicleTypes,
    /// At least one pile is longer than every vehicle type.
    OversizedPiles,
    /// The search ended without a complete packing.
    NoPacking,
}

impl SolveStatus {
    /// Whether every pile ended up in a vehicle.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Solved | Self::NothingToPack)
    }
}

/// Search counters reported alongside a solution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Diagnostics {
    /// Wall-clock time spent solving.
    pub solve_time: Duration,
    /// Search nodes entered.
    pub nodes_explored: u64,
    /// Complete packings that improved on the incumbent.
    pub solutions_found: u64,
    /// `false` when a node or time budget cut the search short.
    pub exhaustive: bool,
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SolveResponse {
    /// Loaded vehicles in commit order.
    pub vehicles: Vec<BuiltVehicle>,
    /// Group-aware billing totals.
    pub stats: BillingStats,
    /// How the solve ended.
    pub status: SolveStatus,
    /// Search counters.
    pub diagnostics: Diagnostics,
}

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The solver was configured with an unusable lane geometry.
    #[error("invalid solver configuration: {0}")]
    InvalidLaneWidth(#[from] LaneGeometryError),
}

/// Assign bundles to a minimal-cost set of vehicles.
///
/// Infeasible inputs are not errors: they produce a response whose
/// [`SolveStatus`] says what went wrong. Solvers must be `Send + Sync` so one
/// instance can serve several threads.
pub trait Solver: Send + Sync {
    /// Solve a request, producing a loading plan or a configuration error.
    ///
    /// # Errors
    /// Returns [`SolveError`] when the solver itself is misconfigured.
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError>;
}
