use crate::error::SimulationError;

/// Steady state of a single cell, as observed between generations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        matches!(self, CellState::Alive)
    }

    /// Numeric tag uploaded to the renderer: 0 = dead, 1 = alive.
    pub fn as_u32(self) -> u32 {
        match self {
            CellState::Dead => 0,
            CellState::Alive => 1,
        }
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive {
            CellState::Alive
        } else {
            CellState::Dead
        }
    }
}

/// Change scheduled for a cell during the mark phase of a generation.
///
/// Transitions only live in the automaton's pending buffer and are resolved
/// into a [`CellState`] before `advance_generation` returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Birth,
    Death,
}

impl Transition {
    pub fn resolve(self) -> CellState {
        match self {
            Transition::Birth => CellState::Alive,
            Transition::Death => CellState::Dead,
        }
    }
}

/// Position of a cell, `x` in `[0, width)` and `y` in `[0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

/// Fixed extents of a grid. Both axes are always at least one cell wide,
/// except for the unallocated placeholder held by a grid before `initialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    pub(crate) const EMPTY: Dimensions = Dimensions { width: 0, height: 0 };

    pub fn new(width: usize, height: usize) -> Result<Self, SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Row-major storage index for `coord`, or `None` outside the grid.
    #[inline]
    pub fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord).then(|| coord.y * self.width + coord.x)
    }

    /// Inverse of [`Dimensions::index`].
    #[inline]
    pub fn coord(&self, index: usize) -> Coord {
        Coord::new(index % self.width, index / self.width)
    }

    /// Every coordinate of the grid in storage order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.cell_count()).map(move |i| Coord::new(i % width, i / width))
    }
}

impl TryFrom<(usize, usize)> for Dimensions {
    type Error = SimulationError;

    fn try_from((width, height): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}
