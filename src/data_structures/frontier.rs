use std::cmp::min;
use std::fmt::Debug;

use crate::cost::Cost;
use crate::derank::derank;
use crate::search::SearchTreeIndex;

/// Insertion number of a frontier entry.
///
/// Strictly increasing over a whole search and never reused.
pub type InsertionSeq = u64;

/// The ranking tuple for the frontier.
///
/// Better f-values first, then FIFO among equal f-values. The sequence number
/// makes every rank unique, so the heap never has to be stable.
///
/// ```
/// use windy_puzzle::data_structures::frontier::FrontierRank;
///
/// assert!(FrontierRank::new(3u32, 9) < FrontierRank::new(4u32, 0));
/// assert!(FrontierRank::new(3u32, 1) < FrontierRank::new(3u32, 2));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierRank<C: Cost> {
    pub f: C,
    pub seq: InsertionSeq,
}

impl<C: Cost> FrontierRank<C> {
    pub fn new(f: C, seq: InsertionSeq) -> Self {
        Self { f, seq }
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "inspect", derive(Clone))]
pub struct FrontierEntry<C: Cost> {
    /// The rank of this entry that defines how good it is.
    pub rank: FrontierRank<C>,
    /// The index of the node in the Search Tree.
    pub node_index: SearchTreeIndex,
}

impl<C: Cost> PartialEq for FrontierEntry<C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<C: Cost> Eq for FrontierEntry<C> {}

impl<C: Cost> PartialOrd for FrontierEntry<C> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<C: Cost> Ord for FrontierEntry<C> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

// A d-ary heap laid out in a Vec.
//
// ```text
//                 0
//      1      2      3      4
//   5..8   9..12  13..16 17..20
// ```
//
//   - Up:         `(i-1) / d`
//   - First child: `d*i + 1`
//   - Last child:  `d*(i+1)`
const HEAP_ARITY: usize = 4usize;

#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    debug_assert!(i > 0, "The root has no parent");
    (i - 1) / HEAP_ARITY
}
#[inline(always)]
#[must_use]
fn down_left(i: usize) -> usize {
    (HEAP_ARITY * i) + 1
}

/// Min-priority queue of search nodes with lazy deletion.
///
/// There's no decrease-key. A State may sit in the frontier several times with
/// different ranks, and the search drops stale entries when they are popped.
#[derive(Debug)]
#[cfg_attr(feature = "inspect", derive(Clone))]
pub struct Frontier<C: Cost> {
    heap: Vec<FrontierEntry<C>>,
}

impl<C: Cost> Frontier<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { heap: vec![] }
    }
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn push(&mut self, f: C, seq: InsertionSeq, node_index: SearchTreeIndex) {
        self.verify_heap();

        let i = self.heap.len();
        self.heap.push(FrontierEntry {
            rank: FrontierRank::new(f, seq),
            node_index,
        });
        self.sift_up(i);

        self.verify_heap();
    }

    pub fn pop(&mut self) -> Option<FrontierEntry<C>> {
        self.verify_heap();

        let last = self.heap.len().checked_sub(1)?;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        self.verify_heap();
        top
    }

    /// Raises an entry.
    /// Returns its new index.
    #[inline(always)]
    fn sift_up(&mut self, mut pos: usize) -> usize {
        debug_assert!(pos < self.heap.len(), "Index out of bounds...");

        while pos > 0 {
            let parent = up(pos);
            if self.heap[parent].rank <= self.heap[pos].rank {
                break;
            }
            self.heap.swap(parent, pos);
            pos = parent;
        }
        pos
    }

    /// Lowers an entry.
    /// Returns its new index.
    #[inline(always)]
    fn sift_down(&mut self, mut pos: usize) -> usize {
        let len = self.heap.len();
        debug_assert!(pos < len, "Index out of bounds...");

        loop {
            let first = down_left(pos);
            if first >= len {
                break;
            }
            let child = first + derank(&self.heap[first..min(first + HEAP_ARITY, len)]);
            if self.heap[pos].rank <= self.heap[child].rank {
                break;
            }
            self.heap.swap(pos, child);
            pos = child;
        }
        pos
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        // Every entry goes after its parent entry, if any.
        for i in 1..self.heap.len() {
            let p = up(i);
            debug_assert!(
                self.heap[p].rank <= self.heap[i].rank,
                "Entry[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }
}

impl<C: Cost> Default for Frontier<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::cost::PuzzleCost;

    fn node(i: usize) -> SearchTreeIndex {
        SearchTreeIndex::new(i)
    }

    #[test]
    fn pops_by_f() {
        let mut frontier = Frontier::<PuzzleCost>::new();
        frontier.push(5, 0, node(0));
        frontier.push(2, 1, node(1));
        frontier.push(9, 2, node(2));
        frontier.push(1, 3, node(3));

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.node_index.get())
            .collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn ties_are_fifo() {
        let mut frontier = Frontier::<PuzzleCost>::new();
        for seq in 0..20u64 {
            frontier.push(7, seq, node(seq as usize));
        }
        frontier.push(3, 20, node(20));

        assert_eq!(frontier.pop().unwrap().node_index.get(), 20);
        for expected in 0..20usize {
            let e = frontier.pop().unwrap();
            assert_eq!(e.node_index.get(), expected);
            assert_eq!(e.rank.seq, expected as u64);
        }
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn interleaved_push_pop_stays_sorted() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut frontier = Frontier::<PuzzleCost>::new();
        let mut seq = 0u64;
        let mut last: Option<FrontierRank<PuzzleCost>> = None;

        for _ in 0..500 {
            for _ in 0..3 {
                let f: PuzzleCost = rng.random_range(0..50);
                // Monotone searches only push ranks at or above what they popped.
                let f = last.map_or(f, |l| f.max(l.f));
                frontier.push(f, seq, node(seq as usize));
                seq += 1;
            }
            let e = frontier.pop().unwrap();
            if let Some(l) = last {
                assert!(l < e.rank);
            }
            last = Some(e.rank);
        }
    }

    #[test]
    fn drains_in_rank_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut frontier = Frontier::<PuzzleCost>::with_capacity(256);
        let mut ranks = vec![];
        for seq in 0..256u64 {
            let f: PuzzleCost = rng.random_range(0..16);
            ranks.push(FrontierRank::new(f, seq));
            frontier.push(f, seq, node(seq as usize));
        }
        ranks.sort();

        let popped: Vec<FrontierRank<PuzzleCost>> =
            std::iter::from_fn(|| frontier.pop()).map(|e| e.rank).collect();
        assert_eq!(popped, ranks);
    }
}
