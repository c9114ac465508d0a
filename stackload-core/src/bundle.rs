//! Bundle rows and their consolidation into piles.
//!
//! Rows sharing a non-empty id describe parts of one physical pile: they are
//! stacked on top of each other, so heights and weights add up while the
//! footprint is the longest member.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::LaneGeometry;
use crate::ingest::sanitise_measure;

/// A cargo line item as entered by the user.
///
/// # Examples
/// ```
/// use stackload_core::BundleRow;
///
/// let row = BundleRow::new("A-1", 120.0, 30.0, 55.0);
/// assert_eq!(row.id, "A-1");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BundleRow {
    /// Merge key; blank ids never merge.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::label")
    )]
    pub id: String,
    /// Length along the vehicle.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub length: f64,
    /// Height of this row's part of the pile.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub height: f64,
    /// Weight of this row's part of the pile.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub weight_per_unit: f64,
}

impl BundleRow {
    /// Construct a row from its raw fields.
    #[must_use]
    pub fn new(id: impl Into<String>, length: f64, height: f64, weight_per_unit: f64) -> Self {
        Self {
            id: id.into(),
            length,
            height,
            weight_per_unit,
        }
    }
}

/// Identifier of a pile, unique within one solve.
///
/// Ids follow consolidated order, so `PileId(0)` is the largest pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PileId(pub usize);

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pile#{}", self.0)
    }
}

/// The atomic unit the solver places into a lane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Pile {
    /// Position in consolidated order.
    pub id: PileId,
    /// Merge key of the source rows, or `#<row>` for rows without an id.
    pub label: String,
    /// Longest member length.
    pub length: f64,
    /// Summed member heights.
    pub height: f64,
    /// Summed member weights.
    pub weight: f64,
    /// Width of the lane the pile occupies.
    pub lane_width: f64,
}

impl Pile {
    /// Side-view area used by the solver's lower bound.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "rectangle area")]
    pub const fn side_area(&self) -> f64 {
        self.length * self.height
    }

    /// Order piles largest first: descending length, then descending height.
    ///
    /// # Examples
    /// ```
    /// use std::cmp::Ordering;
    /// use stackload_core::{Pile, PileId};
    ///
    /// let pile = |length, height| Pile {
    ///     id: PileId(0),
    ///     label: String::new(),
    ///     length,
    ///     height,
    ///     weight: 0.0,
    ///     lane_width: 48.0,
    /// };
    /// assert_eq!(pile(100.0, 10.0).cmp_largest_first(&pile(90.0, 50.0)), Ordering::Less);
    /// assert_eq!(pile(100.0, 10.0).cmp_largest_first(&pile(100.0, 20.0)), Ordering::Greater);
    /// ```
    #[must_use]
    pub fn cmp_largest_first(&self, other: &Self) -> Ordering {
        other
            .length
            .total_cmp(&self.length)
            .then_with(|| other.height.total_cmp(&self.height))
    }
}

#[derive(Debug)]
struct MergedBundle {
    label: String,
    length: f64,
    height: f64,
    weight: f64,
}

impl MergedBundle {
    fn from_row(label: String, row: &BundleRow) -> Self {
        Self {
            label,
            length: sanitise_measure(row.length),
            height: sanitise_measure(row.height),
            weight: sanitise_measure(row.weight_per_unit),
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "merged rows stack their heights and weights"
    )]
    fn absorb(&mut self, row: &BundleRow) {
        self.length = self.length.max(sanitise_measure(row.length));
        self.height += sanitise_measure(row.height);
        self.weight += sanitise_measure(row.weight_per_unit);
    }

    const fn has_extent(&self) -> bool {
        self.length > 0.0 && self.height > 0.0
    }
}

/// Merge duplicate-keyed rows into piles sorted largest first.
///
/// Rows sharing a non-empty (trimmed) id combine into one pile with the
/// maximum length and the summed height and weight. Rows with a blank id each
/// become their own pile. Malformed measurements count as zero, and piles
/// without length or height are dropped. Ties in size keep first-seen order.
///
/// # Examples
/// ```
/// use stackload_core::{BundleRow, LaneGeometry, consolidate_bundles};
///
/// let rows = vec![
///     BundleRow::new("A", 100.0, 10.0, 5.0),
///     BundleRow::new("A", 120.0, 15.0, 5.0),
///     BundleRow::new("", 80.0, 20.0, 1.0),
/// ];
/// let piles = consolidate_bundles(&rows, LaneGeometry::default());
/// assert_eq!(piles.len(), 2);
/// assert_eq!(piles[0].label, "A");
/// assert_eq!(piles[0].length, 120.0);
/// assert_eq!(piles[0].height, 25.0);
/// assert_eq!(piles[1].label, "#3");
/// ```
#[must_use]
pub fn consolidate_bundles(rows: &[BundleRow], lanes: LaneGeometry) -> Vec<Pile> {
    let mut merged: Vec<MergedBundle> = Vec::with_capacity(rows.len());
    let mut slot_by_key: HashMap<&str, usize> = HashMap::new();

    for (row_index, row) in rows.iter().enumerate() {
        let key = row.id.trim();
        if key.is_empty() {
            let label = format!("#{}", row_index.saturating_add(1));
            merged.push(MergedBundle::from_row(label, row));
            continue;
        }
        if let Some(existing) = slot_by_key
            .get(key)
            .and_then(|&slot| merged.get_mut(slot))
        {
            existing.absorb(row);
        } else {
            slot_by_key.insert(key, merged.len());
            merged.push(MergedBundle::from_row(key.to_owned(), row));
        }
    }

    let before_filter = merged.len();
    merged.retain(MergedBundle::has_extent);
    let dropped = before_filter.saturating_sub(merged.len());
    if dropped > 0 {
        log::debug!("dropped {dropped} bundle(s) without length or height");
    }

    merged.sort_by(|lhs, rhs| {
        rhs.length
            .total_cmp(&lhs.length)
            .then_with(|| rhs.height.total_cmp(&lhs.height))
    });

    let piles: Vec<Pile> = merged
        .into_iter()
        .enumerate()
        .map(|(position, bundle)| Pile {
            id: PileId(position),
            label: bundle.label,
            length: bundle.length,
            height: bundle.height,
            weight: bundle.weight,
            lane_width: lanes.lane_width(),
        })
        .collect();
    log::debug!(
        "consolidated {} bundle row(s) into {} pile(s)",
        rows.len(),
        piles.len()
    );
    piles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn lanes() -> LaneGeometry {
        LaneGeometry::default()
    }

    #[rstest]
    fn shared_ids_stack_into_one_pile(lanes: LaneGeometry) {
        let rows = vec![
            BundleRow::new("P", 100.0, 10.0, 3.0),
            BundleRow::new("P", 140.0, 12.0, 4.0),
            BundleRow::new(" P ", 90.0, 8.0, 5.0),
        ];
        let piles = consolidate_bundles(&rows, lanes);
        assert_eq!(piles.len(), 1);
        let pile = piles.first().expect("one pile");
        assert_eq!(pile.label, "P");
        assert_eq!(pile.length, 140.0);
        assert_eq!(pile.height, 30.0);
        assert_eq!(pile.weight, 12.0);
        assert_eq!(pile.lane_width, 48.0);
    }

    #[rstest]
    fn blank_ids_never_merge(lanes: LaneGeometry) {
        let rows = vec![
            BundleRow::new("", 50.0, 10.0, 1.0),
            BundleRow::new("  ", 50.0, 10.0, 1.0),
        ];
        let piles = consolidate_bundles(&rows, lanes);
        let labels: Vec<&str> = piles.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["#1", "#2"]);
    }

    #[rstest]
    fn piles_sort_largest_first_and_ids_follow_order(lanes: LaneGeometry) {
        let rows = vec![
            BundleRow::new("short", 60.0, 50.0, 0.0),
            BundleRow::new("long-low", 120.0, 10.0, 0.0),
            BundleRow::new("long-high", 120.0, 40.0, 0.0),
        ];
        let piles = consolidate_bundles(&rows, lanes);
        let labels: Vec<&str> = piles.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["long-high", "long-low", "short"]);
        let ids: Vec<PileId> = piles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PileId(0), PileId(1), PileId(2)]);
    }

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(10.0, 0.0)]
    #[case(f64::NAN, 10.0)]
    #[case(-5.0, 10.0)]
    fn zero_extent_piles_are_dropped(
        lanes: LaneGeometry,
        #[case] length: f64,
        #[case] height: f64,
    ) {
        let rows = vec![BundleRow::new("x", length, height, 1.0)];
        assert!(consolidate_bundles(&rows, lanes).is_empty());
    }

    #[rstest]
    fn malformed_weight_counts_as_zero(lanes: LaneGeometry) {
        let rows = vec![BundleRow::new("w", 10.0, 10.0, f64::NAN)];
        let piles = consolidate_bundles(&rows, lanes);
        assert_eq!(piles.first().map(|p| p.weight), Some(0.0));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn rows_deserialise_leniently() {
        let json = r#"[
            {"id": 17, "length": "120", "height": " 30 ", "weightPerUnit": null},
            {"id": null, "length": 80, "height": "", "weightPerUnit": "heavy"},
            {"length": 40.5}
        ]"#;
        let rows: Vec<BundleRow> = serde_json::from_str(json).expect("lenient rows");
        assert_eq!(rows.first(), Some(&BundleRow::new("17", 120.0, 30.0, 0.0)));
        assert_eq!(rows.get(1), Some(&BundleRow::new("", 80.0, 0.0, 0.0)));
        assert_eq!(rows.get(2), Some(&BundleRow::new("", 40.5, 0.0, 0.0)));
    }
}
