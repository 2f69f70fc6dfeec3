use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;
use crate::simulation::cell::{CellState, Transition};

/// Local transition rule: decides a cell's fate from its own state and the
/// number of live neighbors at the start of the generation.
pub trait Rule: Send {
    /// `None` leaves the cell unchanged.
    fn next_state(&self, current: CellState, live_neighbors: usize) -> Option<Transition>;
}

impl<T: Rule + ?Sized> Rule for Box<T> {
    fn next_state(&self, current: CellState, live_neighbors: usize) -> Option<Transition> {
        (**self).next_state(current, live_neighbors)
    }
}

/// Conway's Game of Life (B3/S23).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConwayRule;

impl Rule for ConwayRule {
    #[inline]
    fn next_state(&self, current: CellState, live_neighbors: usize) -> Option<Transition> {
        match (current, live_neighbors) {
            (CellState::Dead, 3) => Some(Transition::Birth),
            (CellState::Alive, 2 | 3) => None,
            (CellState::Alive, _) => Some(Transition::Death),
            (CellState::Dead, _) => None,
        }
    }
}

/// Any outer-totalistic birth/survival rule, written as a `B3/S23` rulestring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeLikeRule {
    birth: [bool; 9],
    survival: [bool; 9],
}

impl LifeLikeRule {
    pub fn new(birth: &[usize], survival: &[usize]) -> Result<Self, SimulationError> {
        let mut rule = Self {
            birth: [false; 9],
            survival: [false; 9],
        };
        for &n in birth {
            *rule
                .birth
                .get_mut(n)
                .ok_or_else(|| SimulationError::InvalidRule(format!("birth count {n}")))? = true;
        }
        for &n in survival {
            *rule
                .survival
                .get_mut(n)
                .ok_or_else(|| SimulationError::InvalidRule(format!("survival count {n}")))? = true;
        }
        Ok(rule)
    }

    pub fn conway() -> Self {
        let mut birth = [false; 9];
        let mut survival = [false; 9];
        birth[3] = true;
        survival[2] = true;
        survival[3] = true;
        Self { birth, survival }
    }

    pub fn is_conway(&self) -> bool {
        *self == Self::conway()
    }
}

impl Default for LifeLikeRule {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule for LifeLikeRule {
    fn next_state(&self, current: CellState, live_neighbors: usize) -> Option<Transition> {
        let table = match current {
            CellState::Dead => &self.birth,
            CellState::Alive => &self.survival,
        };
        let hit = table.get(live_neighbors).copied().unwrap_or(false);
        match (current, hit) {
            (CellState::Dead, true) => Some(Transition::Birth),
            (CellState::Alive, false) => Some(Transition::Death),
            _ => None,
        }
    }
}

impl FromStr for LifeLikeRule {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimulationError::InvalidRule(s.to_string());
        let (birth, survival) = s.trim().split_once('/').ok_or_else(invalid)?;

        let digits = |part: &str, prefix: char| -> Result<Vec<usize>, SimulationError> {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) if c.eq_ignore_ascii_case(&prefix) => {}
                _ => return Err(invalid()),
            }
            chars
                .map(|c| match c.to_digit(10) {
                    Some(d) if d <= 8 => Ok(d as usize),
                    _ => Err(invalid()),
                })
                .collect()
        };

        Self::new(&digits(birth, 'B')?, &digits(survival, 'S')?)
    }
}

impl fmt::Display for LifeLikeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for (n, _) in self.birth.iter().enumerate().filter(|&(_, &on)| on) {
            write!(f, "{n}")?;
        }
        write!(f, "/S")?;
        for (n, _) in self.survival.iter().enumerate().filter(|&(_, &on)| on) {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conway_thresholds() {
        let rule = ConwayRule;
        assert_eq!(rule.next_state(CellState::Dead, 3), Some(Transition::Birth));
        assert_eq!(rule.next_state(CellState::Dead, 2), None);
        assert_eq!(rule.next_state(CellState::Dead, 4), None);
        assert_eq!(rule.next_state(CellState::Alive, 2), None);
        assert_eq!(rule.next_state(CellState::Alive, 3), None);
        assert_eq!(rule.next_state(CellState::Alive, 1), Some(Transition::Death));
        assert_eq!(rule.next_state(CellState::Alive, 4), Some(Transition::Death));
        assert_eq!(rule.next_state(CellState::Alive, 0), Some(Transition::Death));
    }

    #[test]
    fn test_life_like_conway_matches_conway_rule() {
        let parsed: LifeLikeRule = "B3/S23".parse().unwrap();
        assert!(parsed.is_conway());
        for n in 0..=8 {
            for state in [CellState::Dead, CellState::Alive] {
                assert_eq!(parsed.next_state(state, n), ConwayRule.next_state(state, n));
            }
        }
    }

    #[test]
    fn test_parse_and_display_highlife() {
        let rule: LifeLikeRule = "b36/s23".parse().unwrap();
        assert_eq!(rule.to_string(), "B36/S23");
        assert_eq!(rule.next_state(CellState::Dead, 6), Some(Transition::Birth));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "B3", "S23/B3", "B9/S23", "B3/S2x", "3/23"] {
            assert!(bad.parse::<LifeLikeRule>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_counts_beyond_table_never_match() {
        let rule = LifeLikeRule::conway();
        assert_eq!(rule.next_state(CellState::Alive, 12), Some(Transition::Death));
        assert_eq!(rule.next_state(CellState::Dead, 12), None);
    }
}
