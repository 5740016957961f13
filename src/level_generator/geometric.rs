//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// The probability used when none is given: on average, half of the nodes of
/// one level are promoted to the next.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `$n$`,
/// then the probability that it is present at level `$n+1$` is some constant
/// `$p \in (0, 1)$`. This produces a geometric distribution, albeit truncated
/// at the maximum height allowed by the caller.
///
/// The random number generator is owned by the level generator, so two
/// generators built with the same seed produce the same sequence of heights.
#[derive(Debug, Clone)]
pub struct Geometric {
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `p` as the probability that
    /// a given node is present in the next level.
    ///
    /// The random number generator is seeded from the operating system.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1.
    #[inline]
    pub fn new(p: f64) -> Result<Self, GeometricError> {
        Self::validate(p)?;
        Ok(Geometric {
            p,
            rng: SmallRng::from_os_rng(),
        })
    }

    /// Create a new geometric level generator whose random number generator is
    /// seeded with `seed`, for reproducible level sequences.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1.
    #[inline]
    pub fn with_seed(p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(p)?;
        Ok(Geometric {
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Create a geometric level generator using [`DEFAULT_PROBABILITY`] and a
    /// random number generator seeded with `seed`.
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Geometric {
            p: DEFAULT_PROBABILITY,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The probability that a node is promoted to the next level.
    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.p
    }

    fn validate(p: f64) -> Result<(), GeometricError> {
        if 0.0 < p && p < 1.0 {
            Ok(())
        } else {
            Err(GeometricError::InvalidProbability)
        }
    }
}

impl Default for Geometric {
    #[inline]
    fn default() -> Self {
        Geometric {
            p: DEFAULT_PROBABILITY,
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl LevelGenerator for Geometric {
    /// Generate a height for a new node using the "loaded dice" technique.
    ///
    /// Starting from a height of 1, a biased coin is flipped repeatedly; each
    /// time it comes up with probability `$p$` the height is raised by one,
    /// until either the coin fails or `max` is reached.
    #[inline]
    fn height(&mut self, max: usize) -> usize {
        let mut height = 1;
        while height < max && self.rng.random::<f64>() < self.p {
            height += 1;
        }
        height
    }
}
