//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level $n > 0$ will contain a random subset of the nodes on level `n - 1`.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level $n$ is $p$ times the chance of occupying level $n-1$
//! (with $0 < p < 1$).
//!
//! Unlike a fixed-depth skiplist, the height of a [`SkipSet`][crate::SkipSet]
//! is not known in advance: it grows by at most one level per insertion. The
//! generator is therefore told the largest height it may return on every call
//! rather than at construction.
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented.

pub mod geometric;

pub use geometric::{DEFAULT_PROBABILITY, Geometric, GeometricError};

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the set, the node is replicated to
/// higher levels with a certain probability as determined by a
/// [`LevelGenerator`].
pub trait LevelGenerator {
    /// Choose the height of a new node, in the range `[1, max]`.
    ///
    /// The skiplist always calls this with `max` equal to its current height
    /// plus one, so `max` is at least 1. Implementations must _never_ return
    /// zero or a value greater than `max`.
    #[must_use]
    fn height(&mut self, max: usize) -> usize;
}

impl<G> LevelGenerator for &mut G
where
    G: LevelGenerator + ?Sized,
{
    #[inline]
    fn height(&mut self, max: usize) -> usize {
        (**self).height(max)
    }
}

impl<G> LevelGenerator for Box<G>
where
    G: LevelGenerator + ?Sized,
{
    #[inline]
    fn height(&mut self, max: usize) -> usize {
        (**self).height(max)
    }
}
