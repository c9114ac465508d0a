//! Vehicle layouts: lane geometry, placed items and built vehicles.
//!
//! Every vehicle is modelled as exactly two parallel lanes of a fixed width.
//! Lane 0 starts at `y = 0` and lane 1 at `y = lane_width`; items advance
//! along `x` and stack upward along `z`.

use thiserror::Error;

use crate::{PileId, VehicleType};

/// Number of lanes in every vehicle.
pub const LANE_COUNT: usize = 2;

/// Errors returned by [`LaneGeometry::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaneGeometryError {
    /// The lane width was zero, negative or not finite.
    #[error("lane width must be positive and finite, got {lane_width}")]
    InvalidWidth {
        /// Rejected width.
        lane_width: f64,
    },
}

/// Fixed two-lane geometry shared by every vehicle in a solve.
///
/// # Examples
/// ```
/// use stackload_core::LaneGeometry;
///
/// # fn main() -> Result<(), stackload_core::LaneGeometryError> {
/// let lanes = LaneGeometry::new(48.0)?;
/// assert_eq!(lanes.lane_offsets(), [0.0, 48.0]);
/// assert_eq!(lanes.required_width(), 96.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneGeometry {
    lane_width: f64,
}

impl LaneGeometry {
    /// Lane width used when no configuration overrides it.
    pub const DEFAULT_LANE_WIDTH: f64 = 48.0;

    /// Validate and construct a [`LaneGeometry`].
    ///
    /// # Errors
    /// Returns [`LaneGeometryError::InvalidWidth`] when `lane_width` is not a
    /// positive, finite number.
    pub fn new(lane_width: f64) -> Result<Self, LaneGeometryError> {
        if lane_width.is_finite() && lane_width > 0.0 {
            Ok(Self { lane_width })
        } else {
            Err(LaneGeometryError::InvalidWidth { lane_width })
        }
    }

    /// Width of a single lane.
    #[must_use]
    pub const fn lane_width(self) -> f64 {
        self.lane_width
    }

    /// `y` offset of each lane.
    #[must_use]
    pub const fn lane_offsets(self) -> [f64; LANE_COUNT] {
        [0.0, self.lane_width]
    }

    /// Minimum vehicle width able to host both lanes.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "two lanes side by side")]
    pub const fn required_width(self) -> f64 {
        self.lane_width * 2.0
    }
}

impl Default for LaneGeometry {
    fn default() -> Self {
        Self {
            lane_width: Self::DEFAULT_LANE_WIDTH,
        }
    }
}

/// A pile with resolved coordinates inside a vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlacedItem {
    /// Identifier of the placed pile.
    pub pile_id: PileId,
    /// Display label of the placed pile.
    pub label: String,
    /// Offset along the vehicle length.
    pub x: f64,
    /// Lane offset across the vehicle width.
    pub y: f64,
    /// Height above the vehicle floor.
    pub z: f64,
    /// Extent along `x`.
    pub length: f64,
    /// Extent along `y`; always the lane width.
    pub lane_width: f64,
    /// Extent along `z`.
    pub height: f64,
    /// Weight carried by this item.
    pub weight: f64,
}

impl PlacedItem {
    /// Bounding volume of the item.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "box volume")]
    pub const fn volume(&self) -> f64 {
        self.length * self.lane_width * self.height
    }

    /// `z` coordinate of the item's top face.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "top face height")]
    pub const fn top(&self) -> f64 {
        self.z + self.height
    }
}

/// Billing facts recorded on a vehicle when it was committed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CostAttributes {
    /// Group shared with other vehicle types; empty when ungrouped.
    pub group_key: String,
    /// Number of instances billed together as one pack.
    pub group_size: usize,
    /// Share of the pack price attributed to one instance.
    pub cost_per_instance: f64,
    /// Price of one full pack.
    pub group_total_cost: f64,
    /// Marginal cost charged when this vehicle was added.
    pub billed_cost: f64,
}

/// A committed vehicle instance with its final layout.
///
/// Built vehicles are immutable once created.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BuiltVehicle {
    /// Type this instance was drawn from.
    pub vehicle_type: VehicleType,
    /// Items placed in the vehicle, ordered by lane, `x`, then `z`.
    pub placed_items: Vec<PlacedItem>,
    /// Length consumed in each lane.
    pub lane_lengths: [f64; LANE_COUNT],
    /// Total weight loaded.
    pub weight_used: f64,
    /// Billing facts for this instance.
    pub cost_attributes: CostAttributes,
}

impl BuiltVehicle {
    /// Identifiers of every pile carried by this vehicle.
    pub fn pile_ids(&self) -> impl Iterator<Item = PileId> + '_ {
        self.placed_items.iter().map(|item| item.pile_id)
    }
}
