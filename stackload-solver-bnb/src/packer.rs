//! Deterministic single-vehicle packing.
//!
//! A vehicle has two lanes. Each lane holds a row of stacks laid end to end;
//! a stack is as long as its longest member and as tall as its members
//! combined. Piles are placed one at a time at the cheapest feasible spot.

use std::cmp::Ordering;

use stackload_core::{LANE_COUNT, LaneGeometry, Pile, PileId, VehicleType};

use crate::pool::{PileArena, PilePool};

/// Piles sharing one floor footprint, bottom member first.
#[derive(Debug, Clone, PartialEq)]
pub struct StackPlan {
    /// Longest member length.
    pub length: f64,
    /// Summed member heights.
    pub height: f64,
    /// Members in placement order.
    pub members: Vec<PileId>,
}

/// Stacks laid end to end in one lane.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LanePlan {
    /// Stacks from the front of the vehicle backwards.
    pub stacks: Vec<StackPlan>,
    /// Summed stack lengths.
    pub used_length: f64,
}

/// Outcome of packing one vehicle instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Packing {
    /// Piles loaded, in placement order.
    pub chosen: Vec<PileId>,
    /// Lane contents.
    pub lanes: [LanePlan; LANE_COUNT],
    /// Summed weight of the chosen piles.
    pub weight_used: f64,
}

impl Packing {
    /// Lane length consumed across both lanes.
    #[must_use]
    pub fn length_packed(&self) -> f64 {
        self.lanes.iter().map(|lane| lane.used_length).sum()
    }

    /// Whether nothing was loaded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    #[expect(clippy::float_arithmetic, reason = "lane and payload accumulation")]
    fn apply(&mut self, pile: &Pile, option: PlacementOption) {
        let Some(lane) = self.lanes.get_mut(option.lane) else {
            return;
        };
        match option.target {
            Target::Stack(run) => {
                if let Some(stack) = lane.stacks.get_mut(run) {
                    stack.length = stack.length.max(pile.length);
                    stack.height += pile.height;
                    stack.members.push(pile.id);
                }
            }
            Target::NewRun => lane.stacks.push(StackPlan {
                length: pile.length,
                height: pile.height,
                members: vec![pile.id],
            }),
        }
        lane.used_length = option.resulting_length;
        self.weight_used += pile.weight;
        self.chosen.push(pile.id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Stack(usize),
    NewRun,
}

#[derive(Debug, Clone, Copy)]
struct PlacementOption {
    lane: usize,
    target: Target,
    incremental: f64,
    resulting_length: f64,
}

impl PlacementOption {
    /// Cheapest growth, then stacking over a new run, then the shorter
    /// resulting lane, then the lower lane and run index.
    fn preference(&self, other: &Self) -> Ordering {
        self.incremental
            .total_cmp(&other.incremental)
            .then_with(|| target_rank(self.target).cmp(&target_rank(other.target)))
            .then_with(|| self.resulting_length.total_cmp(&other.resulting_length))
            .then_with(|| self.lane.cmp(&other.lane))
            .then_with(|| run_index(self.target).cmp(&run_index(other.target)))
    }
}

const fn target_rank(target: Target) -> u8 {
    match target {
        Target::Stack(_) => 0,
        Target::NewRun => 1,
    }
}

const fn run_index(target: Target) -> usize {
    match target {
        Target::Stack(run) => run,
        Target::NewRun => usize::MAX,
    }
}

/// Pack piles from `available` into one instance of `vehicle`.
///
/// `required` piles are placed first, largest first, and the call returns
/// `None` when any of them cannot be placed or is not in `available`. The
/// remaining available piles are then tried greedily in arena order; piles
/// with no feasible spot are left out. A vehicle too narrow for both lanes
/// packs nothing.
///
/// # Examples
/// ```
/// use stackload_core::{LaneGeometry, PileId};
/// use stackload_core::test_support::{pile, vehicle_type};
/// use stackload_solver_bnb::{PileArena, PilePool, pack};
///
/// let arena = PileArena::new(vec![pile(0, 100.0, 30.0, 0.0), pile(1, 100.0, 30.0, 0.0)]);
/// let pool = PilePool::full(&arena);
/// let truck = vehicle_type("T", 240.0, 96.0, 500.0);
/// let packing = pack(&arena, &pool, &truck, &[PileId(0)], LaneGeometry::default())
///     .expect("the required pile fits");
/// assert_eq!(packing.chosen.len(), 2);
/// assert_eq!(packing.length_packed(), 100.0);
/// ```
#[must_use]
pub fn pack(
    arena: &PileArena,
    available: &PilePool,
    vehicle: &VehicleType,
    required: &[PileId],
    lanes: LaneGeometry,
) -> Option<Packing> {
    if !vehicle.accommodates_lanes(lanes) {
        return None;
    }

    let mut forced: Vec<&Pile> = Vec::with_capacity(required.len());
    for &id in required {
        if !available.contains(id) {
            return None;
        }
        forced.push(arena.get(id)?);
    }
    forced.sort_by(|lhs, rhs| lhs.cmp_largest_first(rhs).then(lhs.id.cmp(&rhs.id)));

    let mut packing = Packing::default();
    for pile in forced {
        let option = best_option(&packing, vehicle, pile)?;
        packing.apply(pile, option);
    }

    for pile in available.iter(arena) {
        if required.contains(&pile.id) {
            continue;
        }
        if let Some(option) = best_option(&packing, vehicle, pile) {
            packing.apply(pile, option);
        }
    }
    Some(packing)
}

#[expect(clippy::float_arithmetic, reason = "lane growth and stack heights")]
fn best_option(packing: &Packing, vehicle: &VehicleType, pile: &Pile) -> Option<PlacementOption> {
    if !vehicle.admits_weight(packing.weight_used, pile.weight) {
        return None;
    }

    let mut options = Vec::new();
    for (lane_index, lane) in packing.lanes.iter().enumerate() {
        for (run, stack) in lane.stacks.iter().enumerate() {
            if stack.height + pile.height <= vehicle.height {
                let incremental = stack.length.max(pile.length) - stack.length;
                options.push(PlacementOption {
                    lane: lane_index,
                    target: Target::Stack(run),
                    incremental,
                    resulting_length: lane.used_length + incremental,
                });
            }
        }
        if pile.height <= vehicle.height {
            options.push(PlacementOption {
                lane: lane_index,
                target: Target::NewRun,
                incremental: pile.length,
                resulting_length: lane.used_length + pile.length,
            });
        }
    }

    options
        .into_iter()
        .filter(|option| option.resulting_length <= vehicle.length)
        .min_by(PlacementOption::preference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use stackload_core::test_support::{pile, vehicle_type};

    #[fixture]
    fn truck() -> VehicleType {
        vehicle_type("T", 240.0, 96.0, 500.0)
    }

    fn pack_all(arena: &PileArena, vehicle: &VehicleType) -> Option<Packing> {
        pack(
            arena,
            &PilePool::full(arena),
            vehicle,
            &[PileId(0)],
            LaneGeometry::default(),
        )
    }

    #[rstest]
    fn equal_piles_stack_before_opening_runs(truck: VehicleType) {
        let arena = PileArena::new((0..3).map(|n| pile(n, 100.0, 30.0, 50.0)).collect());
        let packing = pack_all(&arena, &truck).expect("packing");
        assert_eq!(packing.chosen.len(), 3);
        let [first, second] = &packing.lanes;
        assert_eq!(first.stacks.len(), 1);
        assert_eq!(first.stacks.first().map(|s| s.height), Some(90.0));
        assert!(second.stacks.is_empty());
    }

    #[rstest]
    fn full_stack_spills_into_second_lane(truck: VehicleType) {
        let arena = PileArena::new((0..4).map(|n| pile(n, 100.0, 40.0, 0.0)).collect());
        let packing = pack_all(&arena, &truck).expect("packing");
        let [first, second] = &packing.lanes;
        // Two per stack; the third pile prefers a new run in the empty lane.
        assert_eq!(first.stacks.len(), 1);
        assert_eq!(second.stacks.len(), 1);
        assert_eq!(first.used_length, 100.0);
        assert_eq!(second.used_length, 100.0);
        assert_eq!(packing.chosen.len(), 4);
    }

    #[rstest]
    fn longer_pile_grows_an_existing_run_when_cheaper(truck: VehicleType) {
        let arena = PileArena::new(vec![
            pile(0, 200.0, 10.0, 0.0),
            pile(1, 200.0, 10.0, 0.0),
            pile(2, 50.0, 10.0, 0.0),
        ]);
        let packing = pack_all(&arena, &truck).expect("packing");
        let [first, _] = &packing.lanes;
        assert_eq!(first.stacks.first().map(|s| s.members.len()), Some(3));
        assert_eq!(packing.length_packed(), 200.0);
    }

    #[rstest]
    fn required_pile_that_cannot_fit_rejects_the_vehicle(truck: VehicleType) {
        let arena = PileArena::new(vec![pile(0, 300.0, 10.0, 0.0)]);
        assert!(pack_all(&arena, &truck).is_none());
    }

    #[rstest]
    fn required_pile_outside_the_pool_rejects_the_vehicle(truck: VehicleType) {
        let arena = PileArena::new(vec![pile(0, 100.0, 10.0, 0.0)]);
        let pool = PilePool::full(&arena).without(&[PileId(0)]);
        let result = pack(&arena, &pool, &truck, &[PileId(0)], LaneGeometry::default());
        assert!(result.is_none());
    }

    #[rstest]
    fn weight_limit_leaves_heavy_piles_out() {
        let mut truck = vehicle_type("W", 240.0, 96.0, 500.0);
        truck.max_weight = Some(100.0);
        let arena = PileArena::new((0..2).map(|n| pile(n, 100.0, 30.0, 60.0)).collect());
        let packing = pack_all(&arena, &truck).expect("packing");
        assert_eq!(packing.chosen, vec![PileId(0)]);
        assert_eq!(packing.weight_used, 60.0);
    }

    #[rstest]
    fn narrow_vehicles_pack_nothing() {
        let mut narrow = vehicle_type("N", 240.0, 96.0, 500.0);
        narrow.width = 90.0;
        let arena = PileArena::new(vec![pile(0, 100.0, 10.0, 0.0)]);
        assert!(pack_all(&arena, &narrow).is_none());
    }

    #[rstest]
    fn capacity_is_never_exceeded(truck: VehicleType) {
        let arena = PileArena::new(
            (0..12)
                .map(|n| pile(n, 60.0 + 10.0 * f64::from(u8::try_from(n).unwrap_or(0)), 35.0, 0.0))
                .collect(),
        );
        let packing = pack_all(&arena, &truck).expect("packing");
        for lane in &packing.lanes {
            assert!(lane.used_length <= truck.length);
            let summed: f64 = lane.stacks.iter().map(|s| s.length).sum();
            assert_eq!(summed, lane.used_length);
            assert!(lane.stacks.iter().all(|s| s.height <= truck.height));
        }
    }
}
