//! An always-ordered skiplist set.

use std::{cell::Cell, cmp::Ordering, fmt, iter};

use tracing::trace;

use crate::{
    comparator::{Comparator, Natural},
    error::CopyError,
    level_generator::{Geometric, LevelGenerator},
    skipnode::{Cursor, Head, IntoIter, Iter, Link, NodeArena, SkipNode},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipSet
// ////////////////////////////////////////////////////////////////////////////

/// The skip set stores distinct elements such that they are always sorted,
/// and provides expected `O(log n)` search, insertion and removal without
/// ever rebalancing.
///
/// Each element lives in a node whose height is drawn at random when it is
/// inserted. A node of height `h` is linked into levels `0..h`, so the higher
/// levels act as express lanes over the complete chain at level 0. Every
/// operation starts at the head and descends from the top level.
///
/// By default the natural [`Ord`] ordering of the elements is used; any
/// [`Comparator`] can be given instead. Two elements comparing equal are
/// duplicates, and only the first one inserted is kept.
///
/// Every invocation of the comparison while searching is counted (see
/// [`comparisons`][SkipSet::comparisons]), which makes the expected
/// logarithmic behaviour observable.
///
/// The set is intended for use from a single thread; it is not `Sync`.
pub struct SkipSet<T, C = Natural, G = Geometric> {
    head: Head,
    nodes: NodeArena<T>,
    len: usize,
    level_generator: G,
    comparator: C,
    comparisons: Cell<u64>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipSet<T>
where
    T: Ord,
{
    /// Create a new, empty set using the natural ordering of `T`.
    ///
    /// Node heights are drawn from a random number generator seeded from the
    /// operating system.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set: SkipSet<i64> = SkipSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default(), Natural)
    }

    /// Create a new, empty set using the natural ordering of `T` whose node
    /// heights are drawn from a generator seeded with `seed`.
    ///
    /// Two sets built with the same seed and fed the same operations have
    /// exactly the same internal structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut a = SkipSet::with_seed(42);
    /// let mut b = SkipSet::with_seed(42);
    /// a.extend(0..100);
    /// b.extend(0..100);
    /// assert_eq!(a.height(), b.height());
    /// ```
    #[inline]
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_level_generator(Geometric::seeded(seed), Natural)
    }
}

impl<T, C> SkipSet<T, C>
where
    C: Comparator<T>,
{
    /// Create a new, empty set ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// // Descending order.
    /// let mut set = SkipSet::with_comparator(|a: &u64, b: &u64| b.cmp(a));
    /// set.extend([1, 3, 2]);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(compare: C) -> Self {
        Self::with_level_generator(Geometric::default(), compare)
    }

    /// Create a new, empty set ordered by `compare` whose node heights are
    /// drawn from a generator seeded with `seed`.
    #[inline]
    #[must_use]
    pub fn with_seed_and_comparator(seed: u64, compare: C) -> Self {
        Self::with_level_generator(Geometric::seeded(seed), compare)
    }
}

impl<T, C, G> SkipSet<T, C, G>
where
    C: Comparator<T>,
    G: LevelGenerator,
{
    /// Create a new, empty set ordered by `compare` whose node heights are
    /// chosen by `level_generator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{Geometric, Natural, SkipSet};
    ///
    /// // Sparser express lanes than the default.
    /// let generator = Geometric::with_seed(0.25, 7).unwrap();
    /// let mut set = SkipSet::with_level_generator(generator, Natural);
    /// set.extend(0..1000);
    /// assert_eq!(set.len(), 1000);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_level_generator(level_generator: G, compare: C) -> Self {
        SkipSet {
            head: Head::new(),
            nodes: NodeArena::new(),
            len: 0,
            level_generator,
            comparator: compare,
            comparisons: Cell::new(0),
        }
    }

    /// Clears the set, removing all values.
    ///
    /// The height goes back to 1. The comparison counter is left alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..10);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.height(), 1);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        trace!(len = self.len, height = self.head.height(), "clearing skipset");
        self.len = 0;
        self.head = Head::new();
        self.nodes.clear();
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..10);
    /// assert_eq!(set.len(), 10);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current height of the set, that is the number of levels of
    /// the head. It is always at least 1.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.head.height()
    }

    /// Returns the number of comparisons made while searching since the set
    /// was created or the counter was last reset.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..1000);
    /// set.reset_comparisons();
    /// assert!(set.contains(&500));
    /// assert!(set.comparisons() > 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn comparisons(&self) -> u64 {
        self.comparisons.get()
    }

    /// Resets the comparison counter to zero.
    #[inline]
    pub fn reset_comparisons(&self) {
        self.comparisons.set(0);
    }

    /// Insert the element into the set.
    ///
    /// If an equal element is already present, the set is left unchanged and
    /// `false` is returned; this is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.insert(5));
    /// assert!(!set.insert(5));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut update = self.update_table(&value);
        if let Some(next) = self.next_at(update[0], 0) {
            if self.compare(self.nodes[next].value(), &value) == Ordering::Equal {
                return false;
            }
        }

        let max = self.head.height() + 1;
        let height = self.level_generator.height(max).clamp(1, max);
        if height > self.head.height() {
            self.head.grow();
            update.push(Cursor::Head);
            trace!(height = self.head.height(), "skipset grew");
        }

        let id = self.nodes.alloc(SkipNode::new(value, height));
        for (level, &prev) in update.iter().enumerate().take(height) {
            let next = self.next_at(prev, level);
            self.nodes[id].links_mut()[level] = next;
            self.links_mut(prev)[level] = Some(id);
        }
        self.len += 1;
        true
    }

    /// Removes the element equal to `value`, returning whether it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..10);
    /// assert!(set.remove(&4));
    /// assert!(!set.remove(&4));
    /// assert_eq!(set.len(), 9);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the element equal to `value`, or `None` if there is
    /// no such element.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(["Alice".to_string(), "Bob".to_string()]);
    /// assert_eq!(set.take(&"Bob".to_string()), Some("Bob".to_string()));
    /// assert_eq!(set.take(&"Bob".to_string()), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let update = self.update_table(value);
        let candidate = self.next_at(update[0], 0)?;
        if self.compare(self.nodes[candidate].value(), value) != Ordering::Equal {
            return None;
        }

        for (level, &prev) in update.iter().enumerate() {
            if self.next_at(prev, level) != Some(candidate) {
                break;
            }
            let next = self.nodes[candidate].links()[level];
            self.links_mut(prev)[level] = next;
        }
        if self.head.shrink_if_top_empty() {
            trace!(height = self.head.height(), "skipset shrank");
        }

        self.len -= 1;
        Some(self.nodes.release(candidate).into_inner())
    }

    /// Returns true if an element equal to `value` is contained in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(0..10);
    /// assert!(set.contains(&4));
    /// assert!(!set.contains(&15));
    /// ```
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns the node holding the element equal to `value`, or `None`.
    ///
    /// The search stops as soon as an equal element is met, at whichever
    /// level that happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend(["Cal", "Dave", "Ed"]);
    /// let node = set.find(&"Ed").unwrap();
    /// assert_eq!(node.value(), &"Ed");
    /// assert!(node.height() >= 1);
    /// assert!(set.find(&"Zed").is_none());
    /// ```
    pub fn find(&self, value: &T) -> Option<&SkipNode<T>> {
        let mut at = Cursor::Head;
        for level in (0..self.head.height()).rev() {
            while let Some(next) = self.next_at(at, level) {
                let node = &self.nodes[next];
                match self.compare(node.value(), value) {
                    Ordering::Less => at = Cursor::Node(next),
                    Ordering::Equal => return Some(node),
                    Ordering::Greater => break,
                }
            }
        }
        None
    }

    /// Provides a reference to the smallest element, or `None` if the set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.first().is_none());
    /// set.extend([2, 1]);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.head.links()[0].map(|id| self.nodes[id].value())
    }

    /// Provides a reference to the largest element, or `None` if the set is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert!(set.last().is_none());
    /// set.extend([2, 1]);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        let mut at = Cursor::Head;
        for level in (0..self.head.height()).rev() {
            while let Some(next) = self.next_at(at, level) {
                at = Cursor::Node(next);
            }
        }
        match at {
            Cursor::Head => None,
            Cursor::Node(id) => Some(self.nodes[id].value()),
        }
    }

    /// Copies the elements, in ascending order, into `destination` starting
    /// at `index`.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if `destination` is `None`, if `index`
    /// is negative or beyond the end of `destination`, or if fewer than
    /// [`len`][SkipSet::len] slots remain from `index` on.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{CopyError, SkipSet};
    ///
    /// let mut set = SkipSet::new();
    /// set.extend([3, 1, 2]);
    ///
    /// let mut out = [0; 5];
    /// set.copy_to(Some(&mut out[..]), 1).unwrap();
    /// assert_eq!(out, [0, 1, 2, 3, 0]);
    ///
    /// assert_eq!(
    ///     set.copy_to(Some(&mut out[..]), 3),
    ///     Err(CopyError::InsufficientCapacity { required: 3, available: 2 })
    /// );
    /// ```
    pub fn copy_to(&self, destination: Option<&mut [T]>, index: isize) -> Result<(), CopyError>
    where
        T: Clone,
    {
        let destination = destination.ok_or(CopyError::MissingDestination)?;
        let start = usize::try_from(index).map_err(|_err| CopyError::NegativeIndex { index })?;
        let len = destination.len();
        if start > len {
            return Err(CopyError::IndexOutOfBounds { index: start, len });
        }
        let available = len - start;
        if available < self.len {
            return Err(CopyError::InsufficientCapacity {
                required: self.len,
                available,
            });
        }

        for (slot, value) in destination.iter_mut().skip(start).zip(self.iter()) {
            slot.clone_from(value);
        }
        Ok(())
    }

    /// Copies the elements, in ascending order, to the front of
    /// `destination`.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if `destination` is shorter than the
    /// set.
    #[inline]
    pub fn copy_to_slice(&self, destination: &mut [T]) -> Result<(), CopyError>
    where
        T: Clone,
    {
        self.copy_to(Some(destination), 0)
    }

    /// Creates an iterator over the elements of the set, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// set.extend([5, 1, 3]);
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![&1, &3, &5]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            next: self.head.links()[0],
            size: self.len,
        }
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<T, C, G> SkipSet<T, C, G>
where
    C: Comparator<T>,
{
    /// Compare two elements, counting the comparison.
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.comparisons.set(self.comparisons.get().saturating_add(1));
        self.comparator.compare(a, b)
    }

    fn links(&self, at: Cursor) -> &[Link] {
        match at {
            Cursor::Head => self.head.links(),
            Cursor::Node(id) => self.nodes[id].links(),
        }
    }

    fn links_mut(&mut self, at: Cursor) -> &mut [Link] {
        match at {
            Cursor::Head => self.head.links_mut(),
            Cursor::Node(id) => self.nodes[id].links_mut(),
        }
    }

    /// The node following `at` on the given level.
    fn next_at(&self, at: Cursor, level: usize) -> Link {
        self.links(at)[level]
    }

    /// For each level, the last position whose element is strictly less than
    /// `value` (or the head if there is none).
    ///
    /// The descent never backtracks: each level resumes from where the level
    /// above stopped. The returned table has one entry per level of the head.
    fn update_table(&self, value: &T) -> Vec<Cursor> {
        let height = self.head.height();
        let mut update = vec![Cursor::Head; height];
        let mut at = Cursor::Head;
        for level in (0..height).rev() {
            while let Some(next) = self.next_at(at, level) {
                if self.compare(self.nodes[next].value(), value) == Ordering::Less {
                    at = Cursor::Node(next);
                } else {
                    break;
                }
            }
            update[level] = at;
        }
        update
    }

    /// Checks the integrity of the set.
    #[cfg(test)]
    fn check(&self) {
        let level0: Vec<_> = iter::successors(self.head.links()[0], |&id| {
            self.nodes[id].links()[0]
        })
        .collect();
        assert_eq!(level0.len(), self.len, "level 0 holds every element");
        assert_eq!(self.nodes.live(), self.len, "no node outlives its membership");
        assert!(self.head.height() >= 1);

        for pair in level0.windows(2) {
            let (a, b) = (self.nodes[pair[0]].value(), self.nodes[pair[1]].value());
            assert_eq!(
                self.comparator.compare(a, b),
                Ordering::Less,
                "level 0 is strictly ascending"
            );
        }

        for &id in &level0 {
            assert!(self.nodes[id].height() >= 1);
            assert!(self.nodes[id].height() <= self.head.height());
        }

        for level in 1..self.head.height() {
            let linked: Vec<_> = iter::successors(self.head.links()[level], |&id| {
                self.nodes[id].links()[level]
            })
            .collect();
            let expected: Vec<_> = level0
                .iter()
                .copied()
                .filter(|&id| self.nodes[id].height() > level)
                .collect();
            assert_eq!(
                linked, expected,
                "level {level} links exactly the nodes tall enough, in order"
            );
        }
    }
}

impl<T, C, G> SkipSet<T, C, G>
where
    T: fmt::Debug,
{
    /// Renders the links of every level, top level first, for debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::with_seed(1);
    /// set.extend([1, 2, 3]);
    /// let rendered = set.debug_structure();
    /// assert_eq!(rendered.lines().count(), set.height());
    /// assert_eq!(
    ///     rendered.lines().last(),
    ///     Some("<head> --> [1] --> [2] --> [3] -->")
    /// );
    /// ```
    #[must_use]
    pub fn debug_structure(&self) -> String {
        let height = self.head.height();
        let mut rows: Vec<String> = iter::repeat_with(|| String::from("<head> "))
            .take(height)
            .collect();

        let mut next = self.head.links()[0];
        while let Some(id) = next {
            let node = &self.nodes[id];
            let cell = format!("--> [{:?}] ", node.value());
            for (level, row) in rows.iter_mut().enumerate() {
                if level < node.height() {
                    row.push_str(&cell);
                } else {
                    row.extend(iter::repeat_n('-', cell.chars().count()));
                }
            }
            next = node.links()[0];
        }

        rows.iter_mut().for_each(|row| row.push_str("-->"));
        rows.reverse();
        rows.join("\n")
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T> Default for SkipSet<T>
where
    T: Ord,
{
    #[inline]
    fn default() -> Self {
        SkipSet::new()
    }
}

/// This implementation of `PartialEq` only checks that the *values* are equal;
/// it does not check for equivalence of other features (such as the ordering
/// function and the node heights). Furthermore, this uses `T`'s implementation
/// of `PartialEq` and *does not* use the sets' comparison functions.
impl<T, C1, G1, C2, G2> PartialEq<SkipSet<T, C2, G2>> for SkipSet<T, C1, G1>
where
    T: PartialEq,
    C1: Comparator<T>,
    G1: LevelGenerator,
    C2: Comparator<T>,
    G2: LevelGenerator,
{
    #[inline]
    fn eq(&self, other: &SkipSet<T, C2, G2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C, G> Eq for SkipSet<T, C, G>
where
    T: Eq,
    C: Comparator<T>,
    G: LevelGenerator,
{
}

impl<T, C, G> Extend<T> for SkipSet<T, C, G>
where
    C: Comparator<T>,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for element in iterable {
            self.insert(element);
        }
    }
}

impl<T> FromIterator<T> for SkipSet<T>
where
    T: Ord,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipSet<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = SkipSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C, G> fmt::Debug for SkipSet<T, C, G>
where
    T: fmt::Debug,
    C: Comparator<T>,
    G: LevelGenerator,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, G> fmt::Display for SkipSet<T, C, G>
where
    T: fmt::Display,
    C: Comparator<T>,
    G: LevelGenerator,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;

        for (i, entry) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry}")?;
        }
        write!(f, "]")
    }
}

impl<T, C, G> IntoIterator for SkipSet<T, C, G> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            next: self.head.links()[0],
            size: self.len,
            nodes: self.nodes,
        }
    }
}

impl<'a, T, C, G> IntoIterator for &'a SkipSet<T, C, G>
where
    C: Comparator<T>,
    G: LevelGenerator,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
    use rstest::rstest;

    use super::SkipSet;
    use crate::{comparator::Natural, error::CopyError, level_generator::LevelGenerator};

    /// Hands out a fixed sequence of heights, then 1 forever.
    struct Scripted(std::vec::IntoIter<usize>);

    impl LevelGenerator for Scripted {
        fn height(&mut self, max: usize) -> usize {
            self.0.next().unwrap_or(1).min(max)
        }
    }

    fn scripted(heights: &[usize]) -> SkipSet<u32, Natural, Scripted> {
        SkipSet::with_level_generator(Scripted(heights.to_vec().into_iter()), Natural)
    }

    const NAMES: [&str; 8] = ["Alice", "Bob", "Cal", "Dave", "Ed", "Frank", "Gil", "Hank"];

    fn names() -> SkipSet<String> {
        let mut sl = SkipSet::with_seed(0xdead_beef);
        for name in NAMES {
            sl.insert(name.to_string());
            sl.check();
        }
        sl
    }

    #[test]
    fn new_is_empty() {
        let sl: SkipSet<i64> = SkipSet::new();
        sl.check();
        assert!(sl.is_empty());
        assert_eq!(sl.len(), 0);
        assert_eq!(sl.height(), 1);
        assert_eq!(sl.comparisons(), 0);
        assert!(sl.iter().next().is_none());
    }

    #[test]
    fn find_by_value() {
        let sl = names();
        let ed = sl.find(&"Ed".to_string());
        assert_eq!(ed.map(|node| node.value().as_str()), Some("Ed"));
        assert!(sl.find(&"Zed".to_string()).is_none());
        assert_eq!(sl.len(), 8);
    }

    #[test]
    fn remove_then_contains() {
        let mut sl = names();
        assert!(sl.remove(&"Bob".to_string()));
        sl.check();
        assert!(!sl.contains(&"Bob".to_string()));
        assert_eq!(sl.len(), 7);
        assert_eq!(
            sl.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Alice", "Cal", "Dave", "Ed", "Frank", "Gil", "Hank"]
        );
    }

    #[test]
    fn remove_absent() {
        let mut sl: SkipSet<String> = SkipSet::with_seed(1);
        assert!(!sl.remove(&"NotPresent".to_string()));
        assert_eq!(sl.len(), 0);

        let mut sl = names();
        assert!(!sl.remove(&"NotPresent".to_string()));
        sl.check();
        assert_eq!(sl.len(), 8);
    }

    #[test]
    fn shuffled_insert_is_sorted() {
        let mut values: Vec<i32> = (0..10).map(|i| i * 7 - 20).collect();
        let mut rng = SmallRng::seed_from_u64(2024);
        values.shuffle(&mut rng);

        let mut sl = SkipSet::with_seed(3);
        sl.extend(values.iter().copied());
        sl.check();

        values.sort_unstable();
        assert_eq!(sl.iter().copied().collect::<Vec<_>>(), values);
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut sl = SkipSet::with_seed(5);
        sl.extend([1, 9]);
        assert!(sl.insert(5));
        let height = sl.height();
        assert!(!sl.insert(5));
        sl.check();
        assert_eq!(sl.len(), 3);
        assert_eq!(sl.height(), height);
        assert_eq!(sl.iter().copied().collect::<Vec<_>>(), vec![1, 5, 9]);
    }

    #[test]
    fn copy_to_too_small() {
        let sl = names();
        let mut dest = vec![String::new(); 4];
        assert_eq!(
            sl.copy_to(Some(dest.as_mut_slice()), 0),
            Err(CopyError::InsufficientCapacity {
                required: 8,
                available: 4
            })
        );
        assert!(dest.iter().all(String::is_empty));
        assert_eq!(sl.len(), 8);
        sl.check();
    }

    #[rstest]
    #[case(None, 0, CopyError::MissingDestination)]
    #[case(Some(5), -1, CopyError::NegativeIndex { index: -1 })]
    #[case(Some(5), 6, CopyError::IndexOutOfBounds { index: 6, len: 5 })]
    #[case(Some(5), 3, CopyError::InsufficientCapacity { required: 3, available: 2 })]
    #[case(Some(2), 0, CopyError::InsufficientCapacity { required: 3, available: 2 })]
    fn copy_to_errors(
        #[case] capacity: Option<usize>,
        #[case] index: isize,
        #[case] expected: CopyError,
    ) {
        let sl: SkipSet<u8> = [3, 1, 2].into_iter().collect();
        let mut dest = vec![0; capacity.unwrap_or(0)];
        let destination = if capacity.is_some() {
            Some(dest.as_mut_slice())
        } else {
            None
        };
        assert_eq!(sl.copy_to(destination, index), Err(expected));
        assert!(dest.iter().all(|&x| x == 0));
    }

    #[rstest]
    #[case(3, 0, vec![1, 2, 3])]
    #[case(5, 0, vec![1, 2, 3, 0, 0])]
    #[case(5, 2, vec![0, 0, 1, 2, 3])]
    fn copy_to_fits(#[case] capacity: usize, #[case] index: isize, #[case] expected: Vec<u8>) {
        let sl: SkipSet<u8> = [3, 1, 2].into_iter().collect();
        let mut dest = vec![0; capacity];
        assert_eq!(sl.copy_to(Some(dest.as_mut_slice()), index), Ok(()));
        assert_eq!(dest, expected);
    }

    #[test]
    fn copy_empty() -> Result<()> {
        let sl: SkipSet<u8> = SkipSet::new();
        let mut dest: [u8; 0] = [];
        sl.copy_to(Some(&mut dest[..]), 0)?;
        sl.copy_to_slice(&mut dest)?;
        Ok(())
    }

    #[test]
    fn copy_to_slice() -> Result<()> {
        let sl = names();
        let mut dest = vec![String::new(); 8];
        sl.copy_to_slice(&mut dest)?;
        assert_eq!(dest, NAMES.map(String::from).to_vec());
        Ok(())
    }

    #[test]
    fn height_grows_by_one() {
        let mut sl = scripted(&[5, 5, 5, 1]);
        sl.insert(10);
        assert_eq!(sl.height(), 2);
        sl.insert(20);
        assert_eq!(sl.height(), 3);
        sl.insert(30);
        assert_eq!(sl.height(), 4);
        sl.insert(40);
        assert_eq!(sl.height(), 4);
        sl.check();
        assert_eq!(sl.find(&10).map(super::SkipNode::height), Some(2));
        assert_eq!(sl.find(&30).map(super::SkipNode::height), Some(4));
        assert_eq!(sl.find(&40).map(super::SkipNode::height), Some(1));
    }

    #[test]
    fn height_shrinks_when_top_empties() {
        let mut sl = scripted(&[1, 2, 1]);
        sl.extend([1, 2, 3]);
        assert_eq!(sl.height(), 2);

        // 1 and 3 do not reach the top level.
        assert!(sl.remove(&1));
        assert_eq!(sl.height(), 2);
        assert!(sl.remove(&2));
        assert_eq!(sl.height(), 1);
        sl.check();

        assert!(sl.remove(&3));
        assert_eq!(sl.height(), 1);
        assert!(sl.is_empty());
        sl.check();
    }

    #[test]
    fn height_shrinks_one_level_per_removal() {
        // 2 is alone on levels 1 and 2 once 1 is gone.
        let mut sl = scripted(&[2, 3]);
        sl.extend([1, 2]);
        assert_eq!(sl.height(), 3);
        assert!(sl.remove(&1));
        assert_eq!(sl.height(), 3);
        assert!(sl.remove(&2));
        assert_eq!(sl.height(), 2);
        sl.check();
    }

    #[test]
    fn misbehaving_generator_is_clamped() {
        struct Zero;
        impl LevelGenerator for Zero {
            fn height(&mut self, _max: usize) -> usize {
                0
            }
        }

        let mut sl = SkipSet::with_level_generator(Zero, Natural);
        sl.extend(0..50);
        sl.check();
        assert_eq!(sl.height(), 1);
        assert_eq!(sl.len(), 50);
    }

    #[test]
    fn comparisons_counted() {
        let sl = {
            let mut sl = scripted(&[]);
            sl.extend([1, 2, 3]);
            sl
        };
        sl.reset_comparisons();
        assert_eq!(sl.comparisons(), 0);

        assert!(sl.contains(&3));
        assert_eq!(sl.comparisons(), 3);
        assert!(!sl.contains(&4));
        assert_eq!(sl.comparisons(), 6);
        assert!(!sl.contains(&0));
        assert_eq!(sl.comparisons(), 7);

        sl.reset_comparisons();
        assert_eq!(sl.comparisons(), 0);
    }

    #[test]
    fn find_stops_at_upper_level() {
        // 3 is on level 1, so it is found without visiting level 0.
        let sl = {
            let mut sl = scripted(&[1, 1, 2]);
            sl.extend([1, 2, 3]);
            sl
        };
        sl.reset_comparisons();
        assert_eq!(sl.find(&3).map(|node| *node.value()), Some(3));
        assert_eq!(sl.comparisons(), 1);
    }

    #[test]
    fn comparisons_non_decreasing() {
        let mut sl = SkipSet::with_seed(11);
        let mut last = 0;
        for i in (0..200).rev() {
            sl.insert(i);
            assert!(sl.comparisons() >= last);
            last = sl.comparisons();
        }
        for i in 0..200 {
            if i % 3 == 0 {
                sl.remove(&i);
            }
            assert!(sl.comparisons() >= last);
            last = sl.comparisons();
        }
        assert!(last > 0);
    }

    #[test]
    fn with_comparator() {
        let mut sl = SkipSet::with_seed_and_comparator(9, |a: &u64, b: &u64| {
            if a % 2 == b % 2 {
                a.cmp(b)
            } else if a % 2 == 0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });

        for i in 0..100 {
            sl.insert(i);
        }
        sl.check();

        let expect: Vec<u64> = (0..100)
            .filter(|i| i % 2 == 0)
            .chain((0..100).filter(|i| i % 2 == 1))
            .collect();
        assert_eq!(sl.iter().copied().collect::<Vec<_>>(), expect);
        assert!(sl.contains(&51));
        assert!(sl.remove(&51));
        assert!(!sl.contains(&51));
        sl.check();
    }

    #[test]
    fn comparator_decides_duplicates() {
        let mut sl = SkipSet::with_comparator(|a: &String, b: &String| {
            a.to_lowercase().cmp(&b.to_lowercase())
        });
        assert!(sl.insert("Alice".to_string()));
        assert!(!sl.insert("ALICE".to_string()));
        assert!(sl.contains(&"alice".to_string()));
        assert_eq!(sl.iter().collect::<Vec<_>>(), vec!["Alice"]);
    }

    #[test]
    fn take() {
        let mut sl: SkipSet<i64> = (0..10).collect();
        assert_eq!(sl.take(&4), Some(4));
        assert_eq!(sl.take(&4), None);
        assert_eq!(sl.len(), 9);
        sl.check();
    }

    #[test]
    fn first_last() {
        let mut sl = SkipSet::with_seed(21);
        assert_eq!(sl.first(), None);
        assert_eq!(sl.last(), None);
        sl.extend([50, 10, 90, 30]);
        assert_eq!(sl.first(), Some(&10));
        assert_eq!(sl.last(), Some(&90));
        sl.remove(&90);
        assert_eq!(sl.last(), Some(&50));
    }

    #[test]
    fn clear() {
        let mut sl: SkipSet<i64> = (0..100).collect();
        assert_eq!(sl.len(), 100);
        sl.clear();
        sl.check();
        assert!(sl.is_empty());
        assert_eq!(sl.height(), 1);
        sl.extend(0..10);
        sl.check();
        assert_eq!(sl.len(), 10);
    }

    #[test]
    fn basic_large() {
        let size = 10_000;
        let mut sl = SkipSet::with_seed(0x1234_abcd);

        for i in 0..size {
            assert!(sl.insert(i));
            assert_eq!(sl.len(), i + 1);
        }
        sl.check();
        // Expected height is around log2(size); allow generous slack.
        assert!((5..40).contains(&sl.height()), "height {}", sl.height());

        for i in 0..size {
            assert!(sl.remove(&i));
            assert_eq!(sl.len(), size - i - 1);
        }
        sl.check();
    }

    #[test]
    fn search_is_sublinear() {
        let size: u32 = 10_000;
        let mut sl = SkipSet::with_seed(77);
        sl.extend(0..size);
        sl.reset_comparisons();
        for i in (0..size).step_by(100) {
            assert!(sl.contains(&i));
        }
        // A linear scan would average size / 2 comparisons per lookup.
        let average = sl.comparisons() / 100;
        assert!(average < 200, "average of {average} comparisons per lookup");
    }

    #[test]
    fn iter() {
        let size = 1000;
        let sl: SkipSet<usize> = (0..size).rev().collect();

        let mut iter = sl.iter();
        for i in 0..size {
            assert_eq!(iter.size_hint(), (size - i, Some(size - i)));
            assert_eq!(iter.next(), Some(&i));
        }
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert!(iter.next().is_none());

        // Restartable.
        assert_eq!(sl.iter().count(), size);
        assert_eq!((&sl).into_iter().count(), size);
        assert_eq!(sl.into_iter().collect::<Vec<_>>(), (0..size).collect::<Vec<_>>());
    }

    #[test]
    fn into_iter_partial() {
        let sl: SkipSet<String> = NAMES.iter().map(ToString::to_string).collect();
        let mut iter = sl.into_iter();
        assert_eq!(iter.next().as_deref(), Some("Alice"));
        assert_eq!(iter.len(), 7);
        drop(iter);
    }

    #[test]
    fn debug_display() {
        let sl: SkipSet<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(format!("{sl:?}"), "{1, 2, 3}");
        assert_eq!(sl.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn debug_structure() {
        let mut sl = scripted(&[1, 2, 1]);
        sl.extend([1, 2, 3]);
        assert_eq!(
            sl.debug_structure(),
            "<head> ----------> [2] ---------->\n<head> --> [1] --> [2] --> [3] -->"
        );

        let empty = scripted(&[]);
        assert_eq!(empty.debug_structure(), "<head> -->");
    }

    #[test]
    fn equality() {
        let a: SkipSet<i64> = (0..100).collect();
        let b: SkipSet<i64> = (0..100).rev().collect();
        let c: SkipSet<i64> = (0..10).collect();
        let d: SkipSet<i64> = (100..200).collect();

        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(c, d);
    }

    #[test]
    fn seeded_structure_is_reproducible() {
        let mut a = SkipSet::with_seed(8);
        let mut b = SkipSet::with_seed(8);
        a.extend(0..500);
        b.extend(0..500);
        assert_eq!(a.debug_structure(), b.debug_structure());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u16),
        Remove(u16),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..64u16).prop_map(Op::Insert),
            (0..64u16).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The layering holds after every operation, and the height moves by
        /// at most one level at a time.
        #[test]
        fn structure_holds(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..200)) {
            let mut sl = SkipSet::with_seed(seed);
            for action in ops {
                let height = sl.height();
                match action {
                    Op::Insert(x) => {
                        sl.insert(x);
                        prop_assert!(sl.height() == height || sl.height() == height + 1);
                    }
                    Op::Remove(x) => {
                        sl.remove(&x);
                        prop_assert!(sl.height() == height || sl.height() + 1 == height);
                    }
                }
                sl.check();
            }
        }
    }
}
