use crate::cost::Cost;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// A single-start, single-goal problem over a Space.
pub trait Problem<Sp, St, A, C>: std::fmt::Debug
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> &St;
    fn goal(&self) -> &St;

    #[inline(always)]
    fn is_goal(&self, s: &St) -> bool {
        s == self.goal()
    }
}

/// An instance-specific heuristic.
///
/// Unlike a free function of `(State, goal)` it may cache whatever it derives
/// from the problem when it's built.
pub trait Heuristic<St, C>: std::fmt::Debug
where
    St: State,
    C: Cost,
{
    fn h(&self, _s: &St) -> C {
        C::zero()
    }
}

/// The trivial heuristic, turning A* into uniform-cost search.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlindHeuristic;

impl<St, C> Heuristic<St, C> for BlindHeuristic
where
    St: State,
    C: Cost,
{
}
