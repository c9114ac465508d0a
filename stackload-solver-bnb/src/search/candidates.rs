//! Candidate generation and ranking for one search node.

use std::collections::BTreeSet;

use stackload_core::{LaneGeometry, Pile, PileId, VehicleType, sequence_marginal_cost};

use crate::packer::{Packing, pack};
use crate::pool::{PileArena, PilePool};

/// One vehicle of a candidate and what it would carry.
#[derive(Debug, Clone)]
pub(super) struct CandidateStep {
    pub type_index: usize,
    pub packing: Packing,
}

/// A way to serve the required pile: one vehicle, or a same-pack pair
/// packed one after the other.
#[derive(Debug, Clone)]
pub(super) struct Candidate {
    pub steps: Vec<CandidateStep>,
    pub marginal: f64,
    pub length_packed: f64,
}

impl Candidate {
    pub(super) fn type_sequence(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().map(|step| step.type_index)
    }

    fn first_instance_cost(&self, types: &[VehicleType]) -> f64 {
        self.steps
            .first()
            .and_then(|step| types.get(step.type_index))
            .map_or(f64::INFINITY, |vehicle| vehicle.cost_per_instance)
    }
}

/// Build and rank every candidate able to carry `required`.
///
/// Types shorter in height than `required` are skipped. A type billed in
/// packs of two is tried together with its pack mate in both orders; the
/// first vehicle of a sequence must take `required`, the second takes what it
/// can from the rest. A pair whose second vehicle would carry nothing is
/// offered as the first vehicle alone.
pub(super) fn generate<'a, I>(
    arena: &PileArena,
    pool: &PilePool,
    types: &'a [VehicleType],
    required: &Pile,
    built: I,
    lanes: LaneGeometry,
) -> Vec<Candidate>
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    let built: Vec<&VehicleType> = built.into_iter().collect();
    let mut tried: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut offered: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut candidates = Vec::new();

    for (index, vehicle) in types.iter().enumerate() {
        if vehicle.height < required.height {
            continue;
        }
        let sequences = pack_mate(types, index)
            .map_or_else(|| vec![vec![index]], |mate| vec![vec![index, mate], vec![mate, index]]);
        for sequence in sequences {
            if !tried.insert(sequence.clone()) {
                continue;
            }
            let Some(steps) = pack_sequence(arena, pool, types, &sequence, required.id, lanes)
            else {
                continue;
            };
            let actual: Vec<usize> = steps.iter().map(|step| step.type_index).collect();
            if !offered.insert(actual) {
                continue;
            }
            let step_types: Vec<&VehicleType> = steps
                .iter()
                .filter_map(|step| types.get(step.type_index))
                .collect();
            candidates.push(Candidate {
                marginal: sequence_marginal_cost(built.iter().copied(), &step_types),
                length_packed: steps.iter().map(|step| step.packing.length_packed()).sum(),
                steps,
            });
        }
    }

    rank(&mut candidates, types);
    candidates
}

/// Cheapest first, then the most lane length used, then the lower
/// per-instance price, then the lower type indices.
pub(super) fn rank(candidates: &mut [Candidate], types: &[VehicleType]) {
    candidates.sort_by(|lhs, rhs| {
        lhs.marginal
            .total_cmp(&rhs.marginal)
            .then_with(|| rhs.length_packed.total_cmp(&lhs.length_packed))
            .then_with(|| {
                lhs.first_instance_cost(types)
                    .total_cmp(&rhs.first_instance_cost(types))
            })
            .then_with(|| lhs.type_sequence().cmp(rhs.type_sequence()))
    });
}

fn pack_mate(types: &[VehicleType], index: usize) -> Option<usize> {
    let vehicle = types.get(index)?;
    if vehicle.group_size != 2 || !vehicle.is_grouped() {
        return None;
    }
    types
        .iter()
        .enumerate()
        .find(|&(other, candidate)| other != index && candidate.group_key == vehicle.group_key)
        .map(|(other, _)| other)
}

fn pack_sequence(
    arena: &PileArena,
    pool: &PilePool,
    types: &[VehicleType],
    sequence: &[usize],
    required: PileId,
    lanes: LaneGeometry,
) -> Option<Vec<CandidateStep>> {
    let forced = [required];
    let mut remaining = pool.clone();
    let mut steps = Vec::with_capacity(sequence.len());
    for (position, &type_index) in sequence.iter().enumerate() {
        let vehicle = types.get(type_index)?;
        if position == 0 {
            let packing = pack(arena, &remaining, vehicle, &forced, lanes)?;
            remaining = remaining.without(&packing.chosen);
            steps.push(CandidateStep {
                type_index,
                packing,
            });
            continue;
        }
        if remaining.is_empty() {
            break;
        }
        match pack(arena, &remaining, vehicle, &[], lanes) {
            Some(packing) if !packing.is_empty() => {
                remaining = remaining.without(&packing.chosen);
                steps.push(CandidateStep {
                    type_index,
                    packing,
                });
            }
            _ => break,
        }
    }
    Some(steps)
}
