//! The set of chunks that should be resident around an observer.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use loam_terrain::ChunkCoord;
use rustc_hash::FxHashSet;

/// Desired chunk set with a nearest-first creation order.
///
/// Membership is what reconciliation converges to; the order only decides
/// which missing chunks get built first.
#[derive(Debug, Clone, Default)]
pub struct DesiredWindow {
    ordered: Vec<ChunkCoord>,
    members: FxHashSet<ChunkCoord>,
}

impl DesiredWindow {
    /// A window with no chunks. Reconciling against it evicts everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every chunk within Chebyshev distance `radius` of `center`:
    /// `(2 * radius + 1)^2` coordinates, a filled square.
    pub fn around(center: ChunkCoord, radius: u32) -> Self {
        let r = radius as i32;
        let side = 2 * radius as usize + 1;

        // Min-heap on (ring, squared distance, coord).
        let mut heap = BinaryHeap::with_capacity(side * side);
        for dy in -r..=r {
            for dx in -r..=r {
                let coord = center.offset(dx, dy);
                let ring = dx.unsigned_abs().max(dy.unsigned_abs());
                let dist_sq = i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy);
                heap.push(Reverse((ring, dist_sq, coord)));
            }
        }

        let mut ordered = Vec::with_capacity(heap.len());
        while let Some(Reverse((_, _, coord))) = heap.pop() {
            ordered.push(coord);
        }
        Self::from_ordered(ordered)
    }

    /// A window with exactly the given coordinates, in iteration order.
    /// Duplicates are dropped.
    pub fn from_coords(coords: impl IntoIterator<Item = ChunkCoord>) -> Self {
        Self::from_ordered(coords.into_iter().collect())
    }

    fn from_ordered(coords: Vec<ChunkCoord>) -> Self {
        let mut members = FxHashSet::default();
        members.reserve(coords.len());
        let ordered = coords.into_iter().filter(|c| members.insert(*c)).collect();
        Self { ordered, members }
    }

    /// Returns true if `coord` belongs to the window.
    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.members.contains(coord)
    }

    /// Number of coordinates in the window.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true if the window holds no coordinates.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Coordinates in creation priority order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.ordered.iter().copied()
    }

    /// The membership set.
    pub fn as_set(&self) -> &FxHashSet<ChunkCoord> {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality() {
        for r in 0..6 {
            let window = DesiredWindow::around(ChunkCoord::new(3, -7), r);
            let side = 2 * r as usize + 1;
            assert_eq!(window.len(), side * side);
            assert_eq!(window.as_set().len(), side * side);
        }
    }

    #[test]
    fn test_membership_is_chebyshev_square() {
        let center = ChunkCoord::new(-2, 5);
        let window = DesiredWindow::around(center, 2);
        for dy in -4..=4 {
            for dx in -4..=4 {
                let coord = center.offset(dx, dy);
                let inside = dx.abs().max(dy.abs()) <= 2;
                assert_eq!(window.contains(&coord), inside, "{coord}");
            }
        }
    }

    #[test]
    fn test_zero_radius_is_center_only() {
        let window = DesiredWindow::around(ChunkCoord::new(1, 0), 0);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![ChunkCoord::new(1, 0)]);
    }

    #[test]
    fn test_nearest_first_order() {
        let center = ChunkCoord::ORIGIN;
        let window = DesiredWindow::around(center, 3);
        let coords: Vec<_> = window.iter().collect();
        assert_eq!(coords[0], center);
        for pair in coords.windows(2) {
            assert!(
                center.chebyshev_distance(pair[0]) <= center.chebyshev_distance(pair[1]),
                "{} before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_from_coords_drops_duplicates() {
        let a = ChunkCoord::new(0, 1);
        let b = ChunkCoord::new(4, 4);
        let window = DesiredWindow::from_coords([a, b, a]);
        assert_eq!(window.len(), 2);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_empty() {
        let window = DesiredWindow::empty();
        assert!(window.is_empty());
        assert!(!window.contains(&ChunkCoord::ORIGIN));
    }
}
