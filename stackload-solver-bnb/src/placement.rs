//! Stacking-order post-processing for built vehicles.

use std::cmp::Ordering;

use stackload_core::PlacedItem;

/// Reorder every stack so larger and taller items rest at the bottom.
///
/// Items sharing a floor position `(y, x)` form a stack. Each stack is
/// re-sorted by descending length, height and volume and its `z` values are
/// reassigned upward from the floor. Items whose position is not finite
/// cannot be grouped; when that happens the whole list is instead sorted by
/// `(y, x, length desc, height desc)` with `z` left as it was.
///
/// The returned list is ordered by lane, `x`, then `z`.
#[must_use]
pub fn enforce_tallest_at_bottom(items: Vec<PlacedItem>) -> Vec<PlacedItem> {
    let expected = items.len();
    let (mut grouped, stray): (Vec<PlacedItem>, Vec<PlacedItem>) = items
        .into_iter()
        .partition(|item| item.x.is_finite() && item.y.is_finite());

    if grouped.len() != expected {
        log::warn!(
            "{} placed item(s) have no finite floor position; keeping their heights",
            stray.len()
        );
        grouped.extend(stray);
        grouped.sort_by(fallback_order);
        return grouped;
    }

    grouped.sort_by(|lhs, rhs| floor_order(lhs, rhs).then_with(|| bottom_first(lhs, rhs)));
    for stack in grouped.chunk_by_mut(|lhs, rhs| floor_order(lhs, rhs).is_eq()) {
        restack(stack);
    }
    grouped
}

fn restack(stack: &mut [PlacedItem]) {
    let mut z = 0.0;
    for item in stack {
        item.z = z;
        z = item.top();
    }
}

fn floor_order(lhs: &PlacedItem, rhs: &PlacedItem) -> Ordering {
    lhs.y.total_cmp(&rhs.y).then_with(|| lhs.x.total_cmp(&rhs.x))
}

fn bottom_first(lhs: &PlacedItem, rhs: &PlacedItem) -> Ordering {
    rhs.length
        .total_cmp(&lhs.length)
        .then_with(|| rhs.height.total_cmp(&lhs.height))
        .then_with(|| rhs.volume().total_cmp(&lhs.volume()))
}

fn fallback_order(lhs: &PlacedItem, rhs: &PlacedItem) -> Ordering {
    floor_order(lhs, rhs)
        .then_with(|| rhs.length.total_cmp(&lhs.length))
        .then_with(|| rhs.height.total_cmp(&lhs.height))
}
