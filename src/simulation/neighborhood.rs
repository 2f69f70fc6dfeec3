use crate::simulation::boundary::BoundaryPolicy;
use crate::simulation::cell::{Coord, Dimensions};
use crate::simulation::grid::Snapshot;

/// The eight orthogonal + diagonal neighbor offsets.
#[rustfmt::skip]
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// The four orthogonal neighbor offsets.
pub const VON_NEUMANN_OFFSETS: [(i64, i64); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Which cells count as adjacent to a given cell.
pub trait Neighborhood: Send {
    /// Offsets `(dx, dy)` relative to the center cell, never `(0, 0)`.
    fn offsets(&self) -> &[(i64, i64)];

    /// Neighbor coordinates of `cell` after passing each axis through
    /// `boundary`. Offsets the policy maps to "no neighbor" are skipped.
    /// On very small toroidal grids the same coordinate can appear more
    /// than once.
    fn neighbors(
        &self,
        cell: Coord,
        dimensions: Dimensions,
        boundary: &dyn BoundaryPolicy,
    ) -> Vec<Coord> {
        self.offsets()
            .iter()
            .filter_map(|&offset| resolve_neighbor(cell, offset, dimensions, boundary))
            .collect()
    }

    /// Number of live neighbors of `cell` in `snapshot`.
    fn count_live_neighbors(
        &self,
        cell: Coord,
        snapshot: &Snapshot<'_>,
        boundary: &dyn BoundaryPolicy,
    ) -> usize {
        let dimensions = snapshot.dimensions();
        self.offsets()
            .iter()
            .filter_map(|&offset| resolve_neighbor(cell, offset, dimensions, boundary))
            .filter(|&n| snapshot.get(n).is_alive())
            .count()
    }
}

impl<T: Neighborhood + ?Sized> Neighborhood for Box<T> {
    fn offsets(&self) -> &[(i64, i64)] {
        (**self).offsets()
    }
}

#[inline]
fn resolve_neighbor(
    cell: Coord,
    (dx, dy): (i64, i64),
    dimensions: Dimensions,
    boundary: &dyn BoundaryPolicy,
) -> Option<Coord> {
    let x = boundary.resolve(cell.x as i64 + dx, dimensions.width())?;
    let y = boundary.resolve(cell.y as i64 + dy, dimensions.height())?;
    Some(Coord::new(x, y))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Moore;

impl Neighborhood for Moore {
    fn offsets(&self) -> &[(i64, i64)] {
        &MOORE_OFFSETS
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VonNeumann;

impl Neighborhood for VonNeumann {
    fn offsets(&self) -> &[(i64, i64)] {
        &VON_NEUMANN_OFFSETS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::boundary::{Bounded, Toroidal};
    use crate::simulation::cell::CellState;
    use std::collections::HashSet;

    fn dims(width: usize, height: usize) -> Dimensions {
        Dimensions::new(width, height).unwrap()
    }

    #[test]
    fn test_moore_corner_on_torus() {
        let neighbors: HashSet<Coord> = Moore
            .neighbors(Coord::new(0, 0), dims(3, 3), &Toroidal)
            .into_iter()
            .collect();
        let expected: HashSet<Coord> = [(2, 2), (2, 0), (2, 1), (0, 2), (0, 1), (1, 2), (1, 0), (1, 1)]
            .into_iter()
            .map(Coord::from)
            .collect();
        assert_eq!(neighbors.len(), 8);
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn test_bounded_corner_has_three_neighbors() {
        let neighbors = Moore.neighbors(Coord::new(0, 0), dims(3, 3), &Bounded);
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|n| dims(3, 3).contains(*n)));
    }

    #[test]
    fn test_von_neumann_has_four_neighbors() {
        let neighbors = VonNeumann.neighbors(Coord::new(1, 1), dims(3, 3), &Toroidal);
        assert_eq!(
            neighbors,
            vec![Coord::new(0, 1), Coord::new(1, 0), Coord::new(1, 2), Coord::new(2, 1)]
        );
    }

    #[test]
    fn test_count_live_neighbors() {
        let d = dims(3, 3);
        let mut cells = vec![CellState::Dead; 9];
        // Alive: (1,0), (2,2) and the center (1,1), which is not its own neighbor.
        cells[1] = CellState::Alive;
        cells[8] = CellState::Alive;
        cells[4] = CellState::Alive;
        let snapshot = Snapshot::new(d, &cells);
        assert_eq!(Moore.count_live_neighbors(Coord::new(1, 1), &snapshot, &Toroidal), 2);
        // (0,0) sees (1,0), (1,1) and, through the wrap, (2,2).
        assert_eq!(Moore.count_live_neighbors(Coord::new(0, 0), &snapshot, &Toroidal), 3);
        assert_eq!(Moore.count_live_neighbors(Coord::new(0, 0), &snapshot, &Bounded), 2);
    }

    #[test]
    fn test_single_cell_torus_counts_itself_repeatedly() {
        let cells = [CellState::Alive];
        let snapshot = Snapshot::new(dims(1, 1), &cells);
        assert_eq!(Moore.count_live_neighbors(Coord::new(0, 0), &snapshot, &Toroidal), 8);
        assert_eq!(Moore.count_live_neighbors(Coord::new(0, 0), &snapshot, &Bounded), 0);
    }

    #[test]
    fn test_boxed_neighborhood_delegates() {
        let n: Box<dyn Neighborhood> = Box::new(VonNeumann);
        assert_eq!(n.offsets().len(), 4);
    }
}
