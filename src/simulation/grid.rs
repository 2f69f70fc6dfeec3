use std::fmt;

use rand::{Rng, RngCore};

use crate::simulation::cell::{CellState, Coord, Dimensions};

/// Storage for the cell states of an automaton.
pub trait Lattice: Send {
    /// Allocates every cell and seeds each one alive with probability
    /// `occupancy`. Occupancy outside `[0, 1]` is accepted and simply yields
    /// an all-dead or all-alive grid.
    fn initialize(&mut self, dimensions: Dimensions, occupancy: f64, rng: &mut dyn RngCore);

    fn dimensions(&self) -> Dimensions;

    /// Read-only view of the complete current state.
    fn snapshot(&self) -> Snapshot<'_>;

    /// Overwrites one cell. `coord` must lie inside the grid.
    fn set(&mut self, coord: Coord, state: CellState);

    fn get(&self, coord: Coord) -> CellState {
        self.snapshot().get(coord)
    }
}

/// Borrowed view of a grid's cells.
///
/// The grid cannot be mutated while a snapshot of it is alive.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    dimensions: Dimensions,
    cells: &'a [CellState],
}

impl<'a> Snapshot<'a> {
    pub fn new(dimensions: Dimensions, cells: &'a [CellState]) -> Self {
        debug_assert_eq!(dimensions.cell_count(), cells.len());
        Self { dimensions, cells }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// State at `coord`; positions outside the grid read as dead.
    #[inline]
    pub fn get(&self, coord: Coord) -> CellState {
        self.dimensions
            .index(coord)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or_default()
    }

    pub fn cells(&self) -> &'a [CellState] {
        self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellState)> + 'a {
        let dimensions = self.dimensions;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &state)| (dimensions.coord(i), state))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Row-major 0/1 tags, the layout the renderer uploads.
    pub fn to_states(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.as_u32()).collect()
    }
}

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.dimensions.height() {
            for x in 0..self.dimensions.width() {
                let ch = if self.get(Coord::new(x, y)).is_alive() { 'O' } else { '.' };
                write!(f, "{ch}")?;
            }
            if y + 1 < self.dimensions.height() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Dense row-major grid.
#[derive(Clone, Debug)]
pub struct Grid {
    dimensions: Dimensions,
    cells: Vec<CellState>,
}

impl Default for Grid {
    /// An unallocated grid; call [`Lattice::initialize`] before use.
    fn default() -> Self {
        Self {
            dimensions: Dimensions::EMPTY,
            cells: Vec::new(),
        }
    }
}

impl Lattice for Grid {
    fn initialize(&mut self, dimensions: Dimensions, occupancy: f64, rng: &mut dyn RngCore) {
        self.dimensions = dimensions;
        self.cells = (0..dimensions.cell_count())
            .map(|_| CellState::from(rng.gen::<f64>() < occupancy))
            .collect();
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(self.dimensions, &self.cells)
    }

    fn set(&mut self, coord: Coord, state: CellState) {
        match self.dimensions.index(coord) {
            Some(index) => self.cells[index] = state,
            None => panic!(
                "cell {:?} lies outside a {}x{} grid",
                coord,
                self.dimensions.width(),
                self.dimensions.height()
            ),
        }
    }
}
