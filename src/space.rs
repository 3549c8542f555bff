use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

use crate::cost::Cost;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// Inline capacity for expansions.
///
/// Grid-like spaces rarely branch more than this, and staying inline keeps
/// expansion off the allocator.
pub const INLINE_NEIGHBOURS: usize = 4;

/// The successors of a State, in expansion order.
pub type Neighbours<St, A> = SmallVec<[(St, A); INLINE_NEIGHBOURS]>;

pub trait Space<St, A, C>: Clone + std::fmt::Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Applies an Action, if it's legal on the given State.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }

    /// Expands a State.
    ///
    /// The order of the returned successors is the order in which searches
    /// will tie-break them.
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;

    /// Whether a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn size(&self) -> Option<usize> {
        None
    }
}
