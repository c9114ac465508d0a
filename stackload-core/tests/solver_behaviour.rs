//! Tests for the `Solver` trait using a dummy implementation.

use rstest::rstest;
use stackload_core::{
    BillingStats, BundleRow, Diagnostics, LaneGeometry, SolveError, SolveRequest, SolveResponse,
    SolveStatus, Solver, consolidate_bundles,
};

struct DummySolver {
    lane_width: f64,
}

impl Solver for DummySolver {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        let lanes = LaneGeometry::new(self.lane_width)?;
        let piles = consolidate_bundles(&request.bundles, lanes);
        let status = if piles.is_empty() {
            SolveStatus::NothingToPack
        } else {
            SolveStatus::NoPacking
        };
        Ok(SolveResponse {
            vehicles: Vec::new(),
            stats: BillingStats::from_vehicles(&[], piles.len()),
            status,
            diagnostics: Diagnostics::default(),
        })
    }
}

#[rstest]
#[case(48.0, true)]
#[case(0.0, false)]
#[case(f64::NAN, false)]
fn solver_returns_expected(#[case] lane_width: f64, #[case] should_succeed: bool) {
    let solver = DummySolver { lane_width };
    let request = SolveRequest {
        bundles: vec![BundleRow::new("A", 100.0, 30.0, 50.0)],
        vehicles: Vec::new(),
    };
    assert_eq!(solver.solve(&request).is_ok(), should_succeed);
}

#[rstest]
fn invalid_lane_width_surfaces_as_error() {
    let solver = DummySolver { lane_width: -1.0 };
    let result = solver.solve(&SolveRequest::default());
    assert!(matches!(result, Err(SolveError::InvalidLaneWidth(_))));
}

#[rstest]
#[case(Vec::new(), SolveStatus::NothingToPack, 0)]
#[case(vec![BundleRow::new("A", 10.0, 10.0, 1.0)], SolveStatus::NoPacking, 1)]
#[case(vec![BundleRow::new("A", 0.0, 10.0, 1.0)], SolveStatus::NothingToPack, 0)]
fn unplaced_counts_follow_consolidation(
    #[case] bundles: Vec<BundleRow>,
    #[case] status: SolveStatus,
    #[case] unplaced: usize,
) {
    let solver = DummySolver { lane_width: 48.0 };
    let request = SolveRequest {
        bundles,
        vehicles: Vec::new(),
    };
    let Ok(response) = solver.solve(&request) else {
        panic!("dummy solver accepts a valid lane width");
    };
    assert_eq!(response.status, status);
    assert_eq!(response.stats.unplaced_count, unplaced);
}
