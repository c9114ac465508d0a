//! Group-aware billing.
//!
//! Grouped vehicle types are billed per pack of `group_size` instances: the
//! first instance of a pack bills the whole pack price, the remaining
//! instances of that pack bill nothing. Ungrouped types bill their own price.

use std::collections::BTreeMap;

use crate::{BuiltVehicle, VehicleType};

/// Aggregate billing figures for a solve.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BillingStats {
    /// Billed vehicle count; one pack counts once however many members it used.
    pub vehicles_used: usize,
    /// Total billed cost.
    pub total_cost: f64,
    /// Piles that were not loaded.
    pub unplaced_count: usize,
}

impl BillingStats {
    /// Derive billing figures from the final vehicle list.
    ///
    /// # Examples
    /// ```
    /// use stackload_core::BillingStats;
    ///
    /// let stats = BillingStats::from_vehicles(&[], 3);
    /// assert_eq!(stats.vehicles_used, 0);
    /// assert_eq!(stats.unplaced_count, 3);
    /// ```
    #[must_use]
    pub fn from_vehicles(vehicles: &[BuiltVehicle], unplaced_count: usize) -> Self {
        let types = || vehicles.iter().map(|vehicle| &vehicle.vehicle_type);
        Self {
            vehicles_used: billed_vehicle_count(types()),
            total_cost: total_billed_cost(types()),
            unplaced_count,
        }
    }
}

/// Additional billed cost of adding one instance of `candidate`.
///
/// `built` lists the types of every vehicle already committed.
///
/// # Examples
/// ```
/// use stackload_core::{VehicleRow, marginal_cost, normalize_vehicle_types};
///
/// let rows = vec![
///     VehicleRow::new("a", "A", 240.0, 96.0, 96.0, 800.0).with_group("Pair"),
///     VehicleRow::new("b", "B", 240.0, 96.0, 96.0, 800.0).with_group("Pair"),
/// ];
/// let types = normalize_vehicle_types(&rows);
/// let first = &types[0];
/// assert_eq!(marginal_cost([], first), 800.0);
/// assert_eq!(marginal_cost([first], first), 0.0);
/// assert_eq!(marginal_cost([first, first], first), 800.0);
/// ```
#[must_use]
pub fn marginal_cost<'a, I>(built: I, candidate: &VehicleType) -> f64
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    if !candidate.is_grouped() {
        return candidate.cost_per_instance;
    }
    let used = built
        .into_iter()
        .filter(|vehicle| vehicle.group_key == candidate.group_key)
        .count();
    let packs_before = used.div_ceil(candidate.group_size);
    let packs_after = used.saturating_add(1).div_ceil(candidate.group_size);
    pack_price(
        packs_after.saturating_sub(packs_before),
        candidate.group_size,
        candidate.cost_per_instance,
    )
}

/// Marginal cost of committing `sequence` in order after `built`.
///
/// Each step is priced with the earlier steps already counted, so a pair of
/// same-pack members bills a single pack.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "summing step costs")]
pub fn sequence_marginal_cost<'a, I>(built: I, sequence: &[&'a VehicleType]) -> f64
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    let mut seen: Vec<&VehicleType> = built.into_iter().collect();
    let mut total = 0.0;
    for &step in sequence {
        total += marginal_cost(seen.iter().copied(), step);
        seen.push(step);
    }
    total
}

/// Billed vehicle count: one per ungrouped vehicle, one per opened pack.
#[must_use]
pub fn billed_vehicle_count<'a, I>(vehicles: I) -> usize
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    let (singles, packs) = tally(vehicles);
    packs
        .values()
        .map(|pack| pack.used.div_ceil(pack.group_size))
        .fold(singles.count, usize::saturating_add)
}

/// Total billed cost of a vehicle list.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "summing prices")]
pub fn total_billed_cost<'a, I>(vehicles: I) -> f64
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    let (singles, packs) = tally(vehicles);
    singles.cost
        + packs
            .values()
            .map(|pack| {
                pack_price(
                    pack.used.div_ceil(pack.group_size),
                    pack.group_size,
                    pack.cost_per_instance,
                )
            })
            .sum::<f64>()
}

#[derive(Debug, Default)]
struct SingleTally {
    count: usize,
    cost: f64,
}

#[derive(Debug)]
struct PackTally {
    used: usize,
    group_size: usize,
    cost_per_instance: f64,
}

#[expect(clippy::float_arithmetic, reason = "summing prices")]
fn tally<'a, I>(vehicles: I) -> (SingleTally, BTreeMap<&'a str, PackTally>)
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    let mut singles = SingleTally::default();
    let mut packs: BTreeMap<&'a str, PackTally> = BTreeMap::new();
    for vehicle in vehicles {
        if vehicle.is_grouped() {
            packs
                .entry(vehicle.group_key.as_str())
                .or_insert(PackTally {
                    used: 0,
                    group_size: vehicle.group_size,
                    cost_per_instance: vehicle.cost_per_instance,
                })
                .used += 1;
        } else {
            singles.count = singles.count.saturating_add(1);
            singles.cost += vehicle.cost_per_instance;
        }
    }
    (singles, packs)
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "pack counts and group sizes are small integers"
)]
const fn pack_price(packs: usize, group_size: usize, cost_per_instance: f64) -> f64 {
    packs as f64 * group_size as f64 * cost_per_instance
}
