//! Edge behavior: how an out-of-range axis coordinate maps back into the grid.

/// Maps a requested coordinate on one axis into `[0, extent)`.
///
/// Returning `None` means the requested position has no counterpart on the
/// grid (there is no neighbor there).
pub trait BoundaryPolicy: Send {
    fn resolve(&self, requested: i64, extent: usize) -> Option<usize>;
}

impl<T: BoundaryPolicy + ?Sized> BoundaryPolicy for Box<T> {
    fn resolve(&self, requested: i64, extent: usize) -> Option<usize> {
        (**self).resolve(requested, extent)
    }
}

/// Opposite edges are joined, so the grid is a torus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Toroidal;

impl BoundaryPolicy for Toroidal {
    #[inline]
    fn resolve(&self, requested: i64, extent: usize) -> Option<usize> {
        if extent == 0 {
            return None;
        }
        Some(requested.rem_euclid(extent as i64) as usize)
    }
}

/// Everything past the edge is permanently dead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounded;

impl BoundaryPolicy for Bounded {
    #[inline]
    fn resolve(&self, requested: i64, extent: usize) -> Option<usize> {
        usize::try_from(requested).ok().filter(|&c| c < extent)
    }
}
