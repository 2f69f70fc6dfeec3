//! Small hand-placed patterns, mostly for seeding tests and demos.

use std::str::FromStr;

use crate::error::SimulationError;

/// Block: 2x2 still life.
pub const BLOCK: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Blinker: period-2 oscillator, horizontal phase.
pub const BLINKER: [(usize, usize); 3] = [(0, 0), (1, 0), (2, 0)];

/// Glider: moves one cell toward +x, +y every 4 generations.
///
/// ```text
/// .O.
/// ..O
/// OOO
/// ```
pub const GLIDER: [(usize, usize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// R-pentomino: long-lived chaotic methuselah.
pub const R_PENTOMINO: [(usize, usize); 5] = [(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)];

/// A set of live cells relative to the pattern's top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    width: usize,
    height: usize,
    alive: Vec<(usize, usize)>,
}

impl Pattern {
    pub fn from_cells(cells: &[(usize, usize)]) -> Self {
        let width = cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let height = cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
        Self {
            width,
            height,
            alive: cells.to_vec(),
        }
    }

    pub fn block() -> Self {
        Self::from_cells(&BLOCK)
    }

    pub fn blinker() -> Self {
        Self::from_cells(&BLINKER)
    }

    pub fn glider() -> Self {
        Self::from_cells(&GLIDER)
    }

    pub fn r_pentomino() -> Self {
        Self::from_cells(&R_PENTOMINO)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        &self.alive
    }

    pub fn population(&self) -> usize {
        self.alive.len()
    }
}

/// Parses plaintext rows: `O` or `#` alive, `.` dead, lines starting with `!`
/// are comments.
impl FromStr for Pattern {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut alive = Vec::new();
        let rows = s.lines().filter(|line| !line.starts_with('!'));
        for (y, line) in rows.enumerate() {
            for (x, ch) in line.trim_end().chars().enumerate() {
                match ch {
                    'O' | '#' => alive.push((x, y)),
                    '.' => {}
                    other => {
                        return Err(SimulationError::InvalidPattern(format!(
                            "unexpected character {other:?} at row {y}, column {x}"
                        )))
                    }
                }
            }
        }
        Ok(Self::from_cells(&alive))
    }
}
