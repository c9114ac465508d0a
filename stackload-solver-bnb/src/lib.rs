//! Branch-and-bound loading optimiser for Stackload.
//!
//! This crate provides [`BnbSolver`], the default implementation of the
//! [`Solver`](stackload_core::Solver) trait. Consolidated piles live in a
//! shared [`PileArena`]; each search branch tracks what is left with a
//! [`PilePool`] bitset. Every node commits one vehicle (or a same-pack pair)
//! that carries the largest remaining pile, packed greedily into two lanes by
//! [`pack`] and laid out by [`build`].
//!
//! The search is exact unless a node or time budget is configured, in which
//! case the response says so through its diagnostics.

#![forbid(unsafe_code)]

mod builder;
mod packer;
mod placement;
mod pool;
mod search;
mod solver;
mod stats;

pub use builder::build;
pub use packer::{LanePlan, Packing, StackPlan, pack};
pub use placement::enforce_tallest_at_bottom;
pub use pool::{PileArena, PilePool};
pub use solver::{BnbSolver, BnbSolverConfig};
pub use stats::SearchStatistics;
