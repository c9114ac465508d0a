//! Builders for small catalogs and cargo lists used by unit and behaviour
//! tests.

use crate::{
    BuiltVehicle, BundleRow, LaneGeometry, Pile, PileId, SolveRequest, VehicleRow, VehicleType,
};

/// Deck width that fits exactly two default lanes.
pub const STANDARD_WIDTH: f64 = 96.0;

/// An ungrouped vehicle row with the standard width and no weight limit.
#[must_use]
pub fn vehicle_row(code: &str, length: f64, height: f64, cost: f64) -> VehicleRow {
    VehicleRow::new(code, code, length, STANDARD_WIDTH, height, cost)
}

/// Two rows sharing the group `key`, the first carrying the pack price.
#[must_use]
pub fn paired_rows(key: &str, length: f64, height: f64, pack_cost: f64) -> Vec<VehicleRow> {
    vec![
        vehicle_row(&format!("{key}-1"), length, height, pack_cost).with_group(key),
        vehicle_row(&format!("{key}-2"), length, height, 0.0).with_group(key),
    ]
}

/// `count` distinct bundle rows of identical size.
#[must_use]
pub fn identical_bundles(count: usize, length: f64, height: f64, weight: f64) -> Vec<BundleRow> {
    (0..count)
        .map(|n| BundleRow::new(format!("B{n}"), length, height, weight))
        .collect()
}

/// A pile on the default lane geometry.
#[must_use]
pub fn pile(id: usize, length: f64, height: f64, weight: f64) -> Pile {
    Pile {
        id: PileId(id),
        label: format!("B{id}"),
        length,
        height,
        weight,
        lane_width: LaneGeometry::default().lane_width(),
    }
}

/// A standalone priced vehicle type.
#[must_use]
pub fn vehicle_type(code: &str, length: f64, height: f64, cost: f64) -> VehicleType {
    VehicleType {
        code: code.to_owned(),
        name: code.to_owned(),
        group_key: code.to_owned(),
        length,
        width: STANDARD_WIDTH,
        height,
        cost_per_instance: cost,
        group_size: 1,
        group_total_cost: cost,
        max_weight: None,
        original_index: 0,
    }
}

/// Assemble a request from its two tables.
#[must_use]
pub const fn request(bundles: Vec<BundleRow>, vehicles: Vec<VehicleRow>) -> SolveRequest {
    SolveRequest { bundles, vehicles }
}

/// Total number of piles placed across all vehicles.
#[must_use]
pub fn placed_count(vehicles: &[BuiltVehicle]) -> usize {
    vehicles.iter().map(|vehicle| vehicle.placed_items.len()).sum()
}
