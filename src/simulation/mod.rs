mod automaton;
mod boundary;
mod cell;
mod grid;
mod neighborhood;
pub mod patterns;
mod rule;

pub use automaton::{Automaton, CellularAutomaton, ConwayLife};
pub use boundary::{BoundaryPolicy, Bounded, Toroidal};
pub use cell::{CellState, Coord, Dimensions, Transition};
pub use grid::{Grid, Lattice, Snapshot};
pub use neighborhood::{Moore, Neighborhood, VonNeumann, MOORE_OFFSETS, VON_NEUMANN_OFFSETS};
pub use patterns::Pattern;
pub use rule::{ConwayRule, LifeLikeRule, Rule};
