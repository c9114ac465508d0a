//! Facade crate for the Stackload vehicle loading optimiser.
//!
//! This crate re-exports the core domain types and exposes the
//! branch-and-bound solver behind a feature flag.

#![forbid(unsafe_code)]

pub use stackload_core::{
    BillingStats, BuiltVehicle, BundleRow, CostAttributes, Diagnostics, LaneGeometry,
    LaneGeometryError, Pile, PileId, PlacedItem, SolveError, SolveRequest, SolveResponse,
    SolveStatus, Solver, VehicleRow, VehicleType, consolidate_bundles, normalize_vehicle_types,
};

#[cfg(feature = "solver-bnb")]
pub use stackload_solver_bnb::{BnbSolver, BnbSolverConfig};
