//! Vehicle catalog rows and their normalisation into priced types.
//!
//! Catalog rows that share a group key (the trimmed `group` field, or the
//! trimmed `name` when the group is blank) are billed together as a pack. The
//! first row of a group in catalog order carries the pack price; every member
//! is charged an equal share of it per instance.

use std::collections::HashMap;

use crate::LaneGeometry;
use crate::ingest::sanitise_measure;

/// A vehicle definition as entered in the catalog.
///
/// # Examples
/// ```
/// use stackload_core::VehicleRow;
///
/// let row = VehicleRow::new("T53", "Trailer 53", 240.0, 96.0, 96.0, 500.0);
/// assert!(row.group.is_empty());
/// assert_eq!(row.max_weight, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VehicleRow {
    /// Short catalog code.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::label")
    )]
    pub code: String,
    /// Display name; doubles as the group key when `group` is blank.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::label")
    )]
    pub name: String,
    /// Explicit group key for shared pricing.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::label")
    )]
    pub group: String,
    /// Usable deck length.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub length: f64,
    /// Usable deck width.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub width: f64,
    /// Usable stacking height.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub height: f64,
    /// Price of one instance, or of the whole pack on a group's first row.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub cost: f64,
    /// Payload limit; zero or less means unlimited.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::ingest::lenient::measure")
    )]
    pub max_weight: f64,
}

impl VehicleRow {
    /// Construct an ungrouped row without a weight limit.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        length: f64,
        width: f64,
        height: f64,
        cost: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            group: String::new(),
            length,
            width,
            height,
            cost,
            max_weight: 0.0,
        }
    }

    /// Set the pricing group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the payload limit.
    #[must_use]
    pub const fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Key used to bucket rows into pricing groups.
    #[must_use]
    pub fn group_key(&self) -> &str {
        let group = self.group.trim();
        if group.is_empty() {
            self.name.trim()
        } else {
            group
        }
    }

    fn has_positive_dimensions(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|&dimension| sanitise_measure(dimension) > 0.0)
    }
}

/// A normalised, priced vehicle definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VehicleType {
    /// Catalog code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Pricing group; empty when the type is billed on its own.
    pub group_key: String,
    /// Usable deck length.
    pub length: f64,
    /// Usable deck width.
    pub width: f64,
    /// Usable stacking height.
    pub height: f64,
    /// Price attributed to one instance.
    pub cost_per_instance: f64,
    /// Instances billed together as one pack; always at least one.
    pub group_size: usize,
    /// Price of one pack.
    pub group_total_cost: f64,
    /// Payload limit; `None` when unlimited.
    pub max_weight: Option<f64>,
    /// Row index in the raw catalog.
    pub original_index: usize,
}

impl VehicleType {
    /// Whether the type is billed in shared packs.
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.group_size > 1 && !self.group_key.is_empty()
    }

    /// Whether the deck is wide enough for both lanes.
    #[must_use]
    pub fn accommodates_lanes(&self, lanes: LaneGeometry) -> bool {
        self.width >= lanes.required_width()
    }

    /// Whether `additional` weight fits on top of `loaded`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "payload accumulation")]
    pub fn admits_weight(&self, loaded: f64, additional: f64) -> bool {
        self.max_weight
            .is_none_or(|limit| loaded + additional <= limit)
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupSummary {
    size: usize,
    pack_cost: f64,
}

/// Resolve catalog rows into priced vehicle types.
///
/// Rows without a strictly positive length, width and height are dropped
/// before grouping. The surviving rows keep catalog order.
///
/// # Examples
/// ```
/// use stackload_core::{VehicleRow, normalize_vehicle_types};
///
/// let rows = vec![
///     VehicleRow::new("A", "Twin", 240.0, 96.0, 96.0, 800.0).with_group("Pair"),
///     VehicleRow::new("B", "Twin", 240.0, 96.0, 96.0, 0.0).with_group("Pair"),
///     VehicleRow::new("C", "Solo", 300.0, 96.0, 96.0, 650.0),
/// ];
/// let types = normalize_vehicle_types(&rows);
/// assert_eq!(types[0].group_size, 2);
/// assert_eq!(types[1].cost_per_instance, 400.0);
/// assert_eq!(types[2].group_size, 1);
/// ```
#[must_use]
pub fn normalize_vehicle_types(rows: &[VehicleRow]) -> Vec<VehicleType> {
    let valid: Vec<(usize, &VehicleRow)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.has_positive_dimensions())
        .collect();
    let dropped = rows.len().saturating_sub(valid.len());
    if dropped > 0 {
        log::warn!("dropped {dropped} vehicle row(s) without positive dimensions");
    }

    let mut groups: HashMap<&str, GroupSummary> = HashMap::new();
    for &(_, row) in &valid {
        let key = row.group_key();
        if key.is_empty() {
            continue;
        }
        groups
            .entry(key)
            .or_insert(GroupSummary {
                size: 0,
                pack_cost: sanitise_measure(row.cost),
            })
            .size += 1;
    }

    valid
        .into_iter()
        .map(|(original_index, row)| {
            let key = row.group_key();
            let summary = groups.get(key).copied().filter(|group| group.size > 1);
            let (group_size, group_total_cost) = summary.map_or_else(
                || (1, sanitise_measure(row.cost)),
                |group| (group.size, group.pack_cost),
            );
            let max_weight = Some(sanitise_measure(row.max_weight)).filter(|limit| *limit > 0.0);
            VehicleType {
                code: row.code.trim().to_owned(),
                name: row.name.trim().to_owned(),
                group_key: key.to_owned(),
                length: row.length,
                width: row.width,
                height: row.height,
                cost_per_instance: share_of_pack(group_total_cost, group_size),
                group_size,
                group_total_cost,
                max_weight,
                original_index,
            }
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "pack prices are split evenly across small group sizes"
)]
fn share_of_pack(pack_cost: f64, group_size: usize) -> f64 {
    pack_cost / group_size.max(1) as f64
}
