//! Tests for the branch-and-bound search.

use std::time::Duration;

use super::*;
use rstest::{fixture, rstest};
use stackload_core::test_support::{paired_rows, pile, vehicle_type};
use stackload_core::{PileId, normalize_vehicle_types};

#[fixture]
fn lanes() -> LaneGeometry {
    LaneGeometry::default()
}

fn unlimited() -> SearchLimits {
    SearchLimits::default()
}

#[rstest]
fn single_vehicle_carries_a_small_load(lanes: LaneGeometry) {
    let arena = PileArena::new((0..3).map(|n| pile(n, 100.0, 30.0, 50.0)).collect());
    let types = vec![vehicle_type("T", 240.0, 96.0, 500.0)];
    let outcome = run(&arena, &types, lanes, unlimited());
    let vehicles = outcome.vehicles.expect("a complete loading");
    assert_eq!(vehicles.len(), 1);
    assert!(outcome.exhaustive);
    assert_eq!(outcome.stats.solutions_found, 1);
}

#[rstest]
fn cheaper_vehicle_wins_when_both_fit(lanes: LaneGeometry) {
    let arena = PileArena::new(vec![pile(0, 100.0, 30.0, 0.0)]);
    let types = vec![
        vehicle_type("dear", 240.0, 96.0, 900.0),
        vehicle_type("cheap", 240.0, 96.0, 300.0),
    ];
    let outcome = run(&arena, &types, lanes, unlimited());
    let vehicles = outcome.vehicles.expect("a complete loading");
    let codes: Vec<&str> = vehicles.iter().map(|v| v.vehicle_type.code.as_str()).collect();
    assert_eq!(codes, vec!["cheap"]);
}

#[rstest]
fn search_backtracks_past_a_greedy_first_choice(lanes: LaneGeometry) {
    // The short vehicle is cheaper per instance but needs three trips; the
    // long one carries everything at once.
    let arena = PileArena::new((0..6).map(|n| pile(n, 100.0, 90.0, 0.0)).collect());
    let types = vec![
        vehicle_type("short", 100.0, 96.0, 400.0),
        vehicle_type("long", 300.0, 96.0, 1000.0),
    ];
    let outcome = run(&arena, &types, lanes, unlimited());
    let vehicles = outcome.vehicles.expect("a complete loading");
    let total: f64 = vehicles.iter().map(|v| v.cost_attributes.billed_cost).sum();
    assert_eq!(total, 1000.0);
    assert_eq!(vehicles.len(), 1);
}

#[rstest]
fn pairs_are_committed_together_and_billed_once(lanes: LaneGeometry) {
    let arena = PileArena::new((0..4).map(|n| pile(n, 240.0, 96.0, 0.0)).collect());
    let types = normalize_vehicle_types(&paired_rows("Pair", 240.0, 96.0, 800.0));
    let outcome = run(&arena, &types, lanes, unlimited());
    let vehicles = outcome.vehicles.expect("a complete loading");
    assert_eq!(vehicles.len(), 2);
    let billed: Vec<f64> = vehicles
        .iter()
        .map(|v| v.cost_attributes.billed_cost)
        .collect();
    assert_eq!(billed, vec![800.0, 0.0]);
}

#[rstest]
fn taller_piles_than_any_deck_leave_no_candidates(lanes: LaneGeometry) {
    let arena = PileArena::new(vec![pile(0, 100.0, 200.0, 0.0)]);
    let types = vec![vehicle_type("T", 240.0, 96.0, 500.0)];
    let outcome = run(&arena, &types, lanes, unlimited());
    assert!(outcome.vehicles.is_none());
    assert!(outcome.exhaustive);
    assert_eq!(outcome.stats.prunings_infeasible, 1);
}

#[rstest]
fn zero_node_budget_stops_at_the_root(lanes: LaneGeometry) {
    let arena = PileArena::new((0..3).map(|n| pile(n, 100.0, 30.0, 0.0)).collect());
    let types = vec![vehicle_type("T", 240.0, 96.0, 500.0)];
    let limits = SearchLimits {
        node_limit: Some(0),
        deadline: None,
    };
    let outcome = run(&arena, &types, lanes, limits);
    assert!(!outcome.exhaustive);
    assert!(outcome.vehicles.is_none());
}

#[rstest]
fn budget_ending_on_a_finished_loading_keeps_it(lanes: LaneGeometry) {
    let arena = PileArena::new((0..3).map(|n| pile(n, 100.0, 30.0, 0.0)).collect());
    let types = vec![vehicle_type("T", 240.0, 96.0, 500.0)];
    let limits = SearchLimits {
        node_limit: Some(1),
        deadline: None,
    };
    let outcome = run(&arena, &types, lanes, limits);
    assert!(!outcome.exhaustive);
    assert_eq!(outcome.stats.nodes_explored, 1);
    let vehicles = outcome.vehicles.expect("finished loading is kept");
    assert_eq!(vehicles.len(), 1);
    assert_eq!(
        vehicles.iter().map(|v| v.placed_items.len()).sum::<usize>(),
        3
    );
}

#[rstest]
fn expired_deadline_stops_at_the_root(lanes: LaneGeometry) {
    let arena = PileArena::new(vec![pile(0, 100.0, 30.0, 0.0)]);
    let types = vec![vehicle_type("T", 240.0, 96.0, 500.0)];
    let started = Instant::now();
    let limits = SearchLimits {
        node_limit: None,
        deadline: started.checked_sub(Duration::from_millis(1)).or(Some(started)),
    };
    let outcome = run(&arena, &types, lanes, limits);
    assert!(!outcome.exhaustive);
    assert_eq!(outcome.stats.nodes_explored, 0);
}

#[rstest]
fn lower_bound_counts_whole_vehicles(lanes: LaneGeometry) {
    let arena = PileArena::new((0..3).map(|n| pile(n, 240.0, 96.0, 0.0)).collect());
    let types = vec![vehicle_type("T", 240.0, 96.0, 500.0)];
    let search = Search::new(&arena, &types, lanes, unlimited());
    let pool = PilePool::full(&arena);
    assert_eq!(search.lower_bound(&pool, 0.0), 1000.0);
    assert_eq!(
        search.lower_bound(&pool.without(&[PileId(0)]), 100.0),
        600.0
    );
}

#[rstest]
fn lower_bound_charges_full_price_inside_open_packs_of_three(lanes: LaneGeometry) {
    let arena = PileArena::new((0..3).map(|n| pile(n, 240.0, 96.0, 0.0)).collect());
    let trio = VehicleType {
        group_key: "Trio".to_owned(),
        group_size: 3,
        group_total_cost: 900.0,
        ..vehicle_type("Trio", 240.0, 96.0, 300.0)
    };
    let types = vec![trio];
    let search = Search::new(&arena, &types, lanes, unlimited());
    // One trio member is committed and billed the pack price; the two
    // remaining members would ride free, yet each is still charged.
    let pool = PilePool::full(&arena).without(&[PileId(0)]);
    assert_eq!(search.lower_bound(&pool, 900.0), 1500.0);
}

#[rstest]
fn candidates_rank_by_marginal_then_length(lanes: LaneGeometry) {
    let arena = PileArena::new(vec![pile(0, 100.0, 30.0, 0.0), pile(1, 100.0, 30.0, 0.0)]);
    let types = vec![
        vehicle_type("big", 240.0, 96.0, 500.0),
        vehicle_type("tiny", 100.0, 30.0, 500.0),
        vehicle_type("dear", 240.0, 96.0, 700.0),
    ];
    let pool = PilePool::full(&arena);
    let required = pool.largest(&arena).expect("a pile");
    let ranked = candidates::generate(&arena, &pool, &types, required, [], lanes);
    let order: Vec<usize> = ranked
        .iter()
        .filter_map(|c| c.steps.first().map(|s| s.type_index))
        .collect();
    // "tiny" spreads both piles across its lanes, so it outranks "big" at the
    // same price.
    assert_eq!(order, vec![1, 0, 2]);
}

#[rstest]
fn mirrored_pair_sequences_are_offered_once(lanes: LaneGeometry) {
    let arena = PileArena::new((0..4).map(|n| pile(n, 240.0, 96.0, 0.0)).collect());
    let types = normalize_vehicle_types(&paired_rows("Pair", 240.0, 96.0, 800.0));
    let pool = PilePool::full(&arena);
    let required = pool.largest(&arena).expect("a pile");
    let ranked = candidates::generate(&arena, &pool, &types, required, [], lanes);
    let sequences: Vec<Vec<usize>> = ranked
        .iter()
        .map(|c| c.type_sequence().collect())
        .collect();
    assert_eq!(sequences, vec![vec![0, 1], vec![1, 0]]);
    assert!(ranked.iter().all(|c| c.marginal == 800.0));
}

#[rstest]
fn pair_degrades_to_one_vehicle_when_the_mate_is_idle(lanes: LaneGeometry) {
    let arena = PileArena::new(vec![pile(0, 100.0, 30.0, 0.0)]);
    let types = normalize_vehicle_types(&paired_rows("Pair", 240.0, 96.0, 800.0));
    let pool = PilePool::full(&arena);
    let required = pool.largest(&arena).expect("a pile");
    let ranked = candidates::generate(&arena, &pool, &types, required, [], lanes);
    let sequences: Vec<Vec<usize>> = ranked
        .iter()
        .map(|c| c.type_sequence().collect())
        .collect();
    assert_eq!(sequences, vec![vec![0], vec![1]]);
}

#[rstest]
fn persistent_list_shares_tails() {
    let truck = vehicle_type("T", 240.0, 96.0, 500.0);
    let vehicle = |billed_cost: f64| BuiltVehicle {
        vehicle_type: truck.clone(),
        placed_items: Vec::new(),
        lane_lengths: [0.0, 0.0],
        weight_used: 0.0,
        cost_attributes: stackload_core::CostAttributes {
            group_key: String::new(),
            group_size: 1,
            cost_per_instance: 500.0,
            group_total_cost: 500.0,
            billed_cost,
        },
    };
    let root = VehicleList::default().push(vehicle(1.0));
    let left = root.push(vehicle(2.0));
    let right = root.push(vehicle(3.0));
    let costs = |list: &VehicleList| -> Vec<f64> {
        list.to_commit_order()
            .iter()
            .map(|v| v.cost_attributes.billed_cost)
            .collect()
    };
    assert_eq!(costs(&left), vec![1.0, 2.0]);
    assert_eq!(costs(&right), vec![1.0, 3.0]);
    assert_eq!(costs(&root), vec![1.0]);
}
