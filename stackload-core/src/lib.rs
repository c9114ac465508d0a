//! Core domain types for the Stackload loading optimiser.
//!
//! Raw cargo rows are consolidated into piles and raw catalog rows are
//! normalised into priced vehicle types. Solvers implementing [`Solver`] turn
//! both into built vehicles with resolved placements and group-aware billing.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod billing;
mod bundle;
mod ingest;
mod layout;
mod solver;
mod vehicle;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use billing::{
    BillingStats, billed_vehicle_count, marginal_cost, sequence_marginal_cost, total_billed_cost,
};
pub use bundle::{BundleRow, Pile, PileId, consolidate_bundles};
pub use ingest::{parse_measure, sanitise_measure};
pub use layout::{
    BuiltVehicle, CostAttributes, LANE_COUNT, LaneGeometry, LaneGeometryError, PlacedItem,
};
pub use solver::{Diagnostics, SolveError, SolveRequest, SolveResponse, SolveStatus, Solver};
pub use vehicle::{VehicleRow, VehicleType, normalize_vehicle_types};
