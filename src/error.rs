use thiserror::Error;

/// Errors raised while building an automaton or placing cells into it.
///
/// Advancing a generation never fails; every error surfaces at construction
/// or placement time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("cell ({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i64, y: i64 },

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid rule `{0}`, expected a rulestring such as B3/S23")]
    InvalidRule(String),
}
