use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::SimulationError;
use crate::simulation::boundary::{BoundaryPolicy, Toroidal};
use crate::simulation::cell::{CellState, Coord, Dimensions, Transition};
use crate::simulation::grid::{Grid, Lattice, Snapshot};
use crate::simulation::neighborhood::{Moore, Neighborhood};
use crate::simulation::patterns::Pattern;
use crate::simulation::rule::{ConwayRule, Rule};

/// What the surrounding application (rendering, orchestration) sees of an
/// automaton.
///
/// Callers serialize `advance_generation` calls; snapshots are only ever
/// taken between generations.
pub trait CellularAutomaton: Send {
    /// Advances exactly one generation.
    fn advance_generation(&mut self);

    /// Full current state. Every cell is dead or alive.
    fn current_state(&self) -> Snapshot<'_>;

    /// Generations advanced since construction.
    fn generation(&self) -> u64;

    fn dimensions(&self) -> Dimensions {
        self.current_state().dimensions()
    }

    fn population(&self) -> usize {
        self.current_state().population()
    }
}

/// Classic Game of Life on a torus.
pub type ConwayLife = Automaton<Grid, Moore, Toroidal, ConwayRule>;

/// Automaton built from injected storage, neighborhood, edge policy and rule.
///
/// Each generation runs in two phases. The mark phase reads a snapshot of the
/// start-of-generation state and records pending transitions; the commit phase
/// writes them back. Cells that die this generation are still counted as live
/// by their neighbors, since counts come from the start-of-generation state.
pub struct Automaton<L, N, B, R> {
    lattice: L,
    neighborhood: N,
    boundary: B,
    rule: R,
    occupancy: f64,
    generation: u64,
    pending: Vec<(Coord, Transition)>,
}

impl<L, N, B, R> Automaton<L, N, B, R>
where
    L: Lattice,
    N: Neighborhood,
    B: BoundaryPolicy,
    R: Rule,
{
    /// Builds the automaton and seeds the lattice immediately.
    pub fn new(
        occupancy: f64,
        neighborhood: N,
        boundary: B,
        mut lattice: L,
        rule: R,
        dimensions: Dimensions,
        rng: &mut dyn RngCore,
    ) -> Self {
        lattice.initialize(dimensions, occupancy, rng);
        log::debug!(
            "Seeded {}x{} grid at occupancy {:.2}: {} live cells",
            dimensions.width(),
            dimensions.height(),
            occupancy,
            lattice.snapshot().population()
        );

        Self {
            lattice,
            neighborhood,
            boundary,
            rule,
            occupancy,
            generation: 0,
            pending: Vec::new(),
        }
    }

    /// Occupancy the lattice was seeded with.
    pub fn occupancy(&self) -> f64 {
        self.occupancy
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Kills every cell. The generation counter is left alone.
    pub fn clear(&mut self) {
        for coord in self.lattice.dimensions().coords() {
            self.lattice.set(coord, CellState::Dead);
        }
    }

    /// Sets the live cells of `pattern` with its top-left corner at `origin`.
    /// Offsets are passed through the boundary policy, so patterns wrap on a
    /// torus. Nothing is written if any cell falls off a bounded grid.
    pub fn place(&mut self, pattern: &Pattern, origin: (i64, i64)) -> Result<(), SimulationError> {
        let dimensions = self.lattice.dimensions();
        let mut targets = Vec::with_capacity(pattern.population());
        for &(dx, dy) in pattern.cells() {
            let (x, y) = (origin.0 + dx as i64, origin.1 + dy as i64);
            let resolved = self
                .boundary
                .resolve(x, dimensions.width())
                .zip(self.boundary.resolve(y, dimensions.height()));
            match resolved {
                Some((rx, ry)) => targets.push(Coord::new(rx, ry)),
                None => return Err(SimulationError::OutOfBounds { x, y }),
            }
        }
        for coord in targets {
            self.lattice.set(coord, CellState::Alive);
        }
        Ok(())
    }

    fn mark(&mut self) {
        self.pending.clear();
        let snapshot = self.lattice.snapshot();
        for (cell, state) in snapshot.iter() {
            let live = self
                .neighborhood
                .count_live_neighbors(cell, &snapshot, &self.boundary);
            if let Some(transition) = self.rule.next_state(state, live) {
                self.pending.push((cell, transition));
            }
        }
    }

    fn commit(&mut self) {
        for (cell, transition) in self.pending.drain(..) {
            self.lattice.set(cell, transition.resolve());
        }
    }
}

impl ConwayLife {
    /// Conway's rule on a toroidal dense grid. Without a seed the grid is
    /// seeded from entropy and differs between runs.
    pub fn conway(
        width: usize,
        height: usize,
        occupancy: f64,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        let dimensions = Dimensions::new(width, height)?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::new(
            occupancy,
            Moore,
            Toroidal,
            Grid::default(),
            ConwayRule,
            dimensions,
            &mut rng,
        ))
    }
}

impl<L, N, B, R> CellularAutomaton for Automaton<L, N, B, R>
where
    L: Lattice,
    N: Neighborhood,
    B: BoundaryPolicy,
    R: Rule,
{
    fn advance_generation(&mut self) {
        self.mark();
        let changes = self.pending.len();
        self.commit();
        self.generation += 1;
        log::trace!("Generation {}: {} cells changed", self.generation, changes);
    }

    fn current_state(&self) -> Snapshot<'_> {
        self.lattice.snapshot()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::boundary::Bounded;
    use crate::simulation::rule::LifeLikeRule;
    use std::collections::BTreeSet;

    fn empty_life(width: usize, height: usize) -> ConwayLife {
        ConwayLife::conway(width, height, 0.0, Some(0)).unwrap()
    }

    fn alive(automaton: &impl CellularAutomaton) -> BTreeSet<(usize, usize)> {
        automaton
            .current_state()
            .iter()
            .filter(|(_, s)| s.is_alive())
            .map(|(c, _)| (c.x, c.y))
            .collect()
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            ConwayLife::conway(0, 10, 0.5, None),
            Err(SimulationError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_isolated_cell_dies() {
        let mut life = empty_life(5, 5);
        life.place(&Pattern::from_cells(&[(0, 0)]), (2, 2)).unwrap();
        life.advance_generation();
        assert_eq!(life.population(), 0);
        assert_eq!(life.generation(), 1);
    }

    #[test]
    fn test_block_is_still_life() {
        let mut life = empty_life(6, 6);
        life.place(&Pattern::block(), (2, 2)).unwrap();
        let before = alive(&life);
        for _ in 0..10 {
            life.advance_generation();
            assert_eq!(alive(&life), before);
        }
    }

    #[test]
    fn test_dying_cells_still_count_as_neighbors() {
        // The blinker's end cells die this generation, but the cells above and
        // below the center are only born if those ends are counted.
        let mut life = empty_life(5, 5);
        life.place(&Pattern::blinker(), (1, 2)).unwrap();
        life.advance_generation();
        assert_eq!(alive(&life), BTreeSet::from([(2, 1), (2, 2), (2, 3)]));
        life.advance_generation();
        assert_eq!(alive(&life), BTreeSet::from([(1, 2), (2, 2), (3, 2)]));
    }

    #[test]
    fn test_place_wraps_on_torus() {
        let mut life = empty_life(4, 4);
        life.place(&Pattern::block(), (3, 3)).unwrap();
        assert_eq!(alive(&life), BTreeSet::from([(3, 3), (0, 3), (3, 0), (0, 0)]));
    }

    #[test]
    fn test_place_rejects_cells_off_bounded_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut life = Automaton::new(
            0.0,
            Moore,
            Bounded,
            Grid::default(),
            ConwayRule,
            Dimensions::new(4, 4).unwrap(),
            &mut rng,
        );
        let err = life.place(&Pattern::block(), (3, 3)).unwrap_err();
        assert_eq!(err, SimulationError::OutOfBounds { x: 4, y: 3 });
        assert_eq!(life.population(), 0);
    }

    #[test]
    fn test_bounded_edges_kill_blinker_at_corner() {
        // Against a dead edge, a blinker squeezed into the top row loses
        // the births above it and dies out.
        let mut rng = StdRng::seed_from_u64(1);
        let mut life = Automaton::new(
            0.0,
            Moore,
            Bounded,
            Grid::default(),
            ConwayRule,
            Dimensions::new(3, 3).unwrap(),
            &mut rng,
        );
        life.place(&Pattern::blinker(), (0, 0)).unwrap();
        life.advance_generation();
        assert_eq!(alive(&life), BTreeSet::from([(1, 0), (1, 1)]));
        life.advance_generation();
        assert_eq!(life.population(), 0);
    }

    #[test]
    fn test_full_torus_dies_of_overcrowding() {
        let mut life = ConwayLife::conway(3, 3, 1.0, Some(5)).unwrap();
        assert_eq!(life.population(), 9);
        life.advance_generation();
        assert_eq!(life.population(), 0);
    }

    #[test]
    fn test_single_cell_torus() {
        // The lone cell is its own neighbor eight times over.
        let mut life = ConwayLife::conway(1, 1, 1.0, Some(5)).unwrap();
        life.advance_generation();
        assert_eq!(life.population(), 0);
        life.advance_generation();
        assert_eq!(life.population(), 0);
    }

    #[test]
    fn test_clear() {
        let mut life = ConwayLife::conway(8, 8, 0.5, Some(11)).unwrap();
        life.advance_generation();
        life.clear();
        assert_eq!(life.population(), 0);
        assert_eq!(life.generation(), 1);
        assert_eq!(life.occupancy(), 0.5);
    }

    #[test]
    fn test_boxed_collaborators() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut life = Automaton::new(
            0.0,
            Box::new(Moore) as Box<dyn Neighborhood>,
            Box::new(Toroidal) as Box<dyn BoundaryPolicy>,
            Grid::default(),
            LifeLikeRule::conway(),
            Dimensions::new(6, 6).unwrap(),
            &mut rng,
        );
        assert!(life.rule().is_conway());
        life.place(&Pattern::block(), (1, 1)).unwrap();
        life.advance_generation();
        assert_eq!(life.population(), 4);
    }
}
