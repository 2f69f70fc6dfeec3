//! Two-dimensional cellular automata with pluggable neighborhoods, edge
//! policies and transition rules. Conway's Game of Life on a torus is the
//! default configuration.
//!
//! ```
//! use toroidal_life::simulation::{CellularAutomaton, ConwayLife, Pattern};
//!
//! let mut life = ConwayLife::conway(16, 16, 0.0, Some(1)).unwrap();
//! life.place(&Pattern::glider(), (2, 2)).unwrap();
//! life.advance_generation();
//! assert_eq!(life.population(), 5);
//! ```

pub mod config;
pub mod error;
pub mod runner;
pub mod simulation;

pub use error::SimulationError;
