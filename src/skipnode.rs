use std::{fmt, iter::FusedIterator, ops};

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// Index of a node within the arena owned by a [`SkipSet`][crate::SkipSet].
///
/// Links between nodes are stored as ids rather than references, so growing
/// or shrinking a link vector can never leave anything dangling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// A forward reference at one level: either the next node, or the end of the
/// level.
pub(crate) type Link = Option<NodeId>;

/// A position during a descent: either the head sentinel or a node.
///
/// The head holds no value, so it is kept apart from the nodes entirely and
/// the element type never needs an "empty" value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cursor {
    Head,
    Node(NodeId),
}

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// A single element of a [`SkipSet`][crate::SkipSet].
///
/// The node has a height which corresponds to how many levels it is linked
/// into. A node of height `h` has exactly `h` forward links, one per level
/// `0..h`; the link at level 0 is the next element in ascending order.
#[derive(Clone, Debug)]
pub struct SkipNode<T> {
    value: T,
    // Vector of links to the next node at the respective level. Its length is
    // the node's height and is fixed for the node's lifetime.
    links: Vec<Link>,
}

impl<T> SkipNode<T> {
    /// Create a new unlinked node of the given height.
    pub(crate) fn new(value: T, height: usize) -> Self {
        debug_assert!(height >= 1, "a node must occupy at least level 0");
        SkipNode {
            value,
            links: vec![None; height],
        }
    }

    /// The value held by the node.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The number of levels the node is linked into.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.links.len()
    }

    /// Consumes the node returning the value it contains.
    pub(crate) fn into_inner(self) -> T {
        self.value
    }

    pub(crate) fn links(&self) -> &[Link] {
        &self.links
    }

    pub(crate) fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }
}

impl<T> fmt::Display for SkipNode<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Head
// ////////////////////////////////////////////////////////////////////////////

/// The head sentinel: one forward link per level and no value.
///
/// The number of links is the height of the whole skiplist. It never drops
/// below one, so level 0 always exists.
#[derive(Clone, Debug)]
pub(crate) struct Head {
    links: Vec<Link>,
}

impl Head {
    pub(crate) fn new() -> Self {
        Head { links: vec![None] }
    }

    pub(crate) fn height(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn links(&self) -> &[Link] {
        &self.links
    }

    pub(crate) fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }

    /// Add an empty level on top.
    pub(crate) fn grow(&mut self) {
        self.links.push(None);
    }

    /// Drop the top level if nothing occupies it anymore.
    ///
    /// Returns `true` if the head shrank.
    pub(crate) fn shrink_if_top_empty(&mut self) -> bool {
        if self.links.len() > 1 && self.links.last() == Some(&None) {
            self.links.pop();
            true
        } else {
            false
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// NodeArena
// ////////////////////////////////////////////////////////////////////////////

/// Owner of every node in a skiplist.
///
/// Slots freed by removals are recycled by later insertions, so the arena
/// never holds more slots than the largest number of elements the skiplist
/// has ever contained.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Option<SkipNode<T>>>,
    vacant: Vec<usize>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Store a node, returning its id.
    pub(crate) fn alloc(&mut self, node: SkipNode<T>) -> NodeId {
        if let Some(index) = self.vacant.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                *slot = Some(node);
                return NodeId(index);
            }
        }
        self.slots.push(Some(node));
        NodeId(self.slots.len() - 1)
    }

    /// Take a node out of the arena, freeing its slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    pub(crate) fn release(&mut self, id: NodeId) -> SkipNode<T> {
        let node = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("node {id:?} is not live"));
        self.vacant.push(id.0);
        node
    }

    /// Drop every node.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }
}

impl<T> ops::Index<NodeId> for NodeArena<T> {
    type Output = SkipNode<T>;

    fn index(&self, id: NodeId) -> &SkipNode<T> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("node {id:?} is not live"))
    }
}

impl<T> ops::IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut SkipNode<T> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("node {id:?} is not live"))
    }
}

// /////////////////////////////////
// Iterators
// /////////////////////////////////
// Both iterators walk the level-0 chain only; the upper levels are irrelevant
// once the start of the chain is known.

/// Iterator by reference, in ascending order.
pub struct Iter<'a, T> {
    pub(crate) nodes: &'a NodeArena<T>,
    pub(crate) next: Link,
    pub(crate) size: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.links[0];
        self.size -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            next: self.next,
            size: self.size,
        }
    }
}

/// Consuming iterator, in ascending order.
///
/// Each node is released as its value is yielded.
pub struct IntoIter<T> {
    pub(crate) nodes: NodeArena<T>,
    pub(crate) next: Link,
    pub(crate) size: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let node = self.nodes.release(self.next?);
        self.next = node.links[0];
        self.size -= 1;
        Some(node.into_inner())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
