//! A skiplist is a way of storing elements in such a way that elements can be efficiently
//! accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where we each node `[x]` has references to nodes further down the list, allowing the algorithm
//! to effectively skip ahead.
//!
//! This crate provides [`SkipSet`], an ordered set of distinct elements. The height of each node
//! is drawn from a truncated geometric distribution when it is inserted, and the height of the
//! whole set grows or shrinks by at most one level per operation. Node heights come from a
//! seedable [`LevelGenerator`], so a set built with a fixed seed is fully reproducible, and every
//! comparison made while searching is counted to make the expected behaviour observable.
//!
//! ```
//! use skipset::SkipSet;
//!
//! let mut set = SkipSet::with_seed(7);
//! for name in ["Cal", "Alice", "Bob"] {
//!     set.insert(name);
//! }
//! assert!(!set.insert("Bob"));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["Alice", "Bob", "Cal"]);
//! assert!(set.remove(&"Alice"));
//! assert_eq!(set.len(), 2);
//! ```
//!
//! The ordering used by the set **must** be a total order; see [`comparator`] for the details.

pub mod comparator;
mod error;
pub mod level_generator;
mod skipnode;
mod skipset;

pub use comparator::{Comparator, Natural};
pub use error::CopyError;
pub use level_generator::{DEFAULT_PROBABILITY, Geometric, GeometricError, LevelGenerator};
pub use skipnode::{IntoIter, Iter, SkipNode};
pub use skipset::SkipSet;
