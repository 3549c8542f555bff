use nonmax::NonMaxU32;

use crate::cost::Cost;
use crate::space::State;

/// A reference to a `SearchTreeNode<St, C>`.
///
/// An index into the `SearchTree` arena rather than a pointer, so a node can
/// point at its parent without borrowing it. `NonMax` keeps
/// `Option<SearchTreeIndex>` the size of the index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTreeIndex {
    index: NonMaxU32,
}

impl SearchTreeIndex {
    #[inline(always)]
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "Search tree is full");
        Self {
            index: NonMaxU32::new(index as u32).expect("Search tree index overflow"),
        }
    }

    #[inline(always)]
    pub fn get(&self) -> usize {
        self.index.get() as usize
    }
}

/// A node of the search tree.
///
/// Created once when its State is generated and never updated afterwards.
/// Several nodes may carry the same State; the search decides which one
/// counts.
#[derive(Debug)]
#[cfg_attr(feature = "inspect", derive(Clone))]
pub struct SearchTreeNode<St, C>
where
    St: State,
    C: Cost,
{
    pub(crate) parent: Option<SearchTreeIndex>,
    pub(crate) state: St,
    pub(crate) g: C,
    pub(crate) h: C,
}

impl<St, C> SearchTreeNode<St, C>
where
    St: State,
    C: Cost,
{
    pub fn new(s: St, parent: Option<SearchTreeIndex>, g: C, h: C) -> Self {
        Self {
            parent,
            state: s,
            g,
            h,
        }
    }

    pub fn state(&self) -> &St {
        &self.state
    }
    pub fn parent(&self) -> Option<SearchTreeIndex> {
        self.parent
    }
    pub fn g(&self) -> C {
        self.g
    }
    pub fn h(&self) -> C {
        self.h
    }
    #[inline(always)]
    pub fn f(&self) -> C {
        self.g.saturating_add(&self.h)
    }
}

/// All the Search Nodes.
///
/// Naturally forms a Search Tree rooted at the start, as every other node has
/// exactly one parent created before it. The arena only grows.
pub(crate) struct SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, C>>,
}

impl<St, C> SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    #[inline(always)]
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, node: SearchTreeNode<St, C>) -> SearchTreeIndex {
        debug_assert!(
            node.parent.is_none_or(|p| p.get() < self.nodes.len()),
            "Parents must exist before their children"
        );
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }
}

impl<St, C> Default for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, C> std::ops::Index<SearchTreeIndex> for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    type Output = SearchTreeNode<St, C>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.get()]
    }
}

impl<St, C> std::fmt::Debug for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
