//! Turn a [`Packing`] into a committed [`BuiltVehicle`].

use stackload_core::{BuiltVehicle, CostAttributes, LaneGeometry, PlacedItem, VehicleType};

use crate::packer::Packing;
use crate::placement::enforce_tallest_at_bottom;
use crate::pool::{PileArena, PilePool};

/// Resolve coordinates for `packing` and remove its piles from `pool`.
///
/// Stacks are laid from `x = 0` in each lane; lane 0 sits at `y = 0` and lane
/// 1 at `y = lane_width`. Heights are then settled by
/// [`enforce_tallest_at_bottom`]. The caller's pool is left untouched; the
/// returned pool is the one the next branch step should use.
///
/// # Examples
/// ```
/// use stackload_core::{LaneGeometry, PileId};
/// use stackload_core::test_support::{pile, vehicle_type};
/// use stackload_solver_bnb::{PileArena, PilePool, build, pack};
///
/// let lanes = LaneGeometry::default();
/// let arena = PileArena::new(vec![pile(0, 100.0, 30.0, 5.0)]);
/// let pool = PilePool::full(&arena);
/// let truck = vehicle_type("T", 240.0, 96.0, 500.0);
/// let packing = pack(&arena, &pool, &truck, &[PileId(0)], lanes).expect("fits");
/// let (vehicle, rest) = build(&arena, &pool, &truck, &packing, 500.0, lanes);
/// assert_eq!(vehicle.placed_items.len(), 1);
/// assert!(rest.is_empty());
/// assert_eq!(pool.len(), 1);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "cumulative lane offsets")]
pub fn build(
    arena: &PileArena,
    pool: &PilePool,
    vehicle: &VehicleType,
    packing: &Packing,
    billed_cost: f64,
    lanes: LaneGeometry,
) -> (BuiltVehicle, PilePool) {
    let mut items = Vec::with_capacity(packing.chosen.len());
    for (lane, y) in packing.lanes.iter().zip(lanes.lane_offsets()) {
        let mut x = 0.0;
        for stack in &lane.stacks {
            let mut z = 0.0;
            for pile in stack.members.iter().filter_map(|&id| arena.get(id)) {
                items.push(PlacedItem {
                    pile_id: pile.id,
                    label: pile.label.clone(),
                    x,
                    y,
                    z,
                    length: pile.length,
                    lane_width: lanes.lane_width(),
                    height: pile.height,
                    weight: pile.weight,
                });
                z += pile.height;
            }
            x += stack.length;
        }
    }

    let built = BuiltVehicle {
        vehicle_type: vehicle.clone(),
        placed_items: enforce_tallest_at_bottom(items),
        lane_lengths: packing.lanes.each_ref().map(|lane| lane.used_length),
        weight_used: packing.weight_used,
        cost_attributes: CostAttributes {
            group_key: vehicle.group_key.clone(),
            group_size: vehicle.group_size,
            cost_per_instance: vehicle.cost_per_instance,
            group_total_cost: vehicle.group_total_cost,
            billed_cost,
        },
    };
    (built, pool.without(&packing.chosen))
}
