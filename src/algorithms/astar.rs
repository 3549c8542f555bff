use std::marker::PhantomData;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::cost::Cost;
use crate::data_structures::frontier::FrontierEntry;
use crate::data_structures::frontier::Frontier;
use crate::data_structures::frontier::InsertionSeq;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::report::Expansion;
use crate::report::ExpansionSink;
use crate::report::FnSink;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// How a search ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome<St, C>
where
    St: State,
    C: Cost,
{
    /// The goal was accepted, as the last expansion.
    GoalFound {
        goal: Expansion<St, C>,
        node: SearchTreeIndex,
    },
    /// Every reachable State was expanded without meeting the goal.
    Exhausted { expansions: usize },
    /// The expansion limit ran out first.
    LimitReached { expansions: usize },
}

impl<St, C> SearchOutcome<St, C>
where
    St: State,
    C: Cost,
{
    pub fn expansions(&self) -> usize {
        match self {
            SearchOutcome::GoalFound { goal, .. } => goal.index,
            SearchOutcome::Exhausted { expansions } => *expansions,
            SearchOutcome::LimitReached { expansions } => *expansions,
        }
    }

    pub fn is_goal_found(&self) -> bool {
        matches!(self, SearchOutcome::GoalFound { .. })
    }

    /// The goal expansion, or why there's none.
    pub fn into_result(self) -> Result<Expansion<St, C>, SearchError> {
        match self {
            SearchOutcome::GoalFound { goal, .. } => Ok(goal),
            SearchOutcome::Exhausted { expansions } => {
                Err(SearchError::NoSolutionFound { expansions })
            }
            SearchOutcome::LimitReached { expansions } => {
                Err(SearchError::LimitReached { expansions })
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("No solution found after expanding {expansions} states")]
    NoSolutionFound { expansions: usize },
    #[error("Gave up after expanding {expansions} states")]
    LimitReached { expansions: usize },
}

/// Best-first search on `f = g + h`, breaking ties by insertion order.
///
/// The heuristic is trusted as-is, admissible or not, so the first path to
/// a State is the one that counts:
///   - Nodes are never updated. A State reached again gets a new node and a
///     new frontier entry.
///   - Popping a State that was already expanded discards the entry (lazy
///     deletion), so there's no decrease-key and no re-expansion.
#[derive(Debug)]
pub struct AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// All the Search Nodes, including the ones whose State was already
    /// expanded through a better node.
    search_tree: SearchTree<St, C>,

    /// Entries ranked by `(f, insertion_seq)`.
    open: Frontier<C>,
    /// Next insertion number. The root takes 0.
    next_seq: InsertionSeq,

    /// The "Closed Set". Only States, the nodes are in `search_tree`.
    explored: FxHashSet<St>,
    expansions: usize,
    expansion_limit: Option<usize>,
    outcome: Option<SearchOutcome<St, C>>,

    problem: P,
    heuristic: H,

    _phantom_space: PhantomData<Sp>,
    _phantom_action: PhantomData<A>,
}

impl<P, H, Sp, St, A, C> AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: P, heuristic: H) -> Self {
        let mut search = Self {
            search_tree: SearchTree::<St, C>::with_capacity(1024),
            open: Frontier::with_capacity(1024),
            next_seq: 0,
            explored: FxHashSet::default(),
            expansions: 0,
            expansion_limit: None,
            outcome: None,

            problem,
            heuristic,

            _phantom_space: PhantomData,
            _phantom_action: PhantomData,
        };

        let start = *search.problem.start();
        debug_assert!(search.problem.space().valid(&start));
        let h = search.heuristic.h(&start);
        search.push_new(start, None, C::zero(), h);
        log::info!("Searching from {start:?} (h={h})");

        search
    }

    /// Stops after accepting `limit` nodes.
    #[must_use]
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Nodes accepted so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }
    pub fn is_explored(&self, s: &St) -> bool {
        self.explored.contains(s)
    }
    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }
    pub fn frontier_len(&self) -> usize {
        self.open.len()
    }
    pub fn generated(&self) -> usize {
        self.search_tree.len()
    }
    pub fn node(&self, index: SearchTreeIndex) -> &SearchTreeNode<St, C> {
        &self.search_tree[index]
    }
    pub fn outcome(&self) -> Option<&SearchOutcome<St, C>> {
        self.outcome.as_ref()
    }

    /// Runs the search to the end, reporting every accepted node.
    pub fn explore<K>(&mut self, sink: &mut K) -> SearchOutcome<St, C>
    where
        K: ExpansionSink<St, C>,
    {
        loop {
            if let Some(outcome) = self.step(sink) {
                return outcome;
            }
        }
    }

    /// Pops a single frontier entry.
    ///
    /// Returns the outcome once the search is over, and keeps returning it.
    pub fn step<K>(&mut self, sink: &mut K) -> Option<SearchOutcome<St, C>>
    where
        K: ExpansionSink<St, C>,
    {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let outcome = self.pop_and_expand(sink)?;
        match &outcome {
            SearchOutcome::GoalFound { goal, .. } => {
                log::info!(
                    "Goal found after {} expansions (g={}, {} nodes generated)",
                    goal.index,
                    goal.g,
                    self.search_tree.len()
                );
            }
            SearchOutcome::Exhausted { expansions } => {
                log::info!("Frontier exhausted after {expansions} expansions, no solution");
            }
            SearchOutcome::LimitReached { expansions } => {
                log::info!("Stopped after {expansions} expansions");
            }
        }
        self.outcome = Some(outcome);
        self.outcome
    }

    fn pop_and_expand<K>(&mut self, sink: &mut K) -> Option<SearchOutcome<St, C>>
    where
        K: ExpansionSink<St, C>,
    {
        if self
            .expansion_limit
            .is_some_and(|limit| self.expansions >= limit)
        {
            return Some(SearchOutcome::LimitReached {
                expansions: self.expansions,
            });
        }

        let Some(FrontierEntry { rank, node_index }) = self.open.pop() else {
            return Some(SearchOutcome::Exhausted {
                expansions: self.expansions,
            });
        };

        let node = &self.search_tree[node_index];
        let (state, g, h) = (*node.state(), node.g(), node.h());
        debug_assert_eq!(rank.f, node.f());

        if !self.explored.insert(state) {
            log::trace!("Dropping stale entry {state:?} (f={}, #{})", rank.f, rank.seq);
            return None;
        }

        self.expansions += 1;
        let expansion = Expansion {
            state,
            g,
            h,
            index: self.expansions,
        };
        log::debug!("#{} {state:?} g={g} h={h}", self.expansions);
        sink.report(&expansion);

        if self.problem.is_goal(&state) {
            return Some(SearchOutcome::GoalFound {
                goal: expansion,
                node: node_index,
            });
        }

        // Explored neighbours still get their entries, they are dropped when
        // popped.
        for (s, a) in self.problem.space().neighbours(&state) {
            let c: C = self.problem.space().cost(&state, &a);
            debug_assert!(c != C::zero());
            let child_g = g.saturating_add(&c);
            let child_h = self.heuristic.h(&s);
            self.push_new(s, Some(node_index), child_g, child_h);
        }

        None
    }

    #[inline(always)]
    fn push_new(&mut self, s: St, parent: Option<SearchTreeIndex>, g: C, h: C) {
        let node = SearchTreeNode::<St, C>::new(s, parent, g, h);
        let f = node.f();
        let node_index = self.search_tree.push(node);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.open.push(f, seq, node_index);
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "AStarSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, C>>();
        let l = self.search_tree.len();
        let c = self.search_tree.capacity();
        writeln!(
            out,
            "  - |Nodes|:    {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Nodes|*:   {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<FrontierEntry<C>>();
        let l = self.open.len();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|:     {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Open|*:    {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<St>();
        let l = self.explored.len();
        let c = self.explored.capacity();
        writeln!(
            out,
            "  - |Closed|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Closed|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;
        if let Some(space_size) = self.problem.space().size() {
            writeln!(
                out,
                "  - Space:      {} states",
                space_size.separate_with_commas()
            )?;
        }

        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.expansions.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Stale entries:  {}",
            (self.search_tree.len() - self.open.len() - self.expansions).separate_with_commas()
        )?;

        Ok(())
    }
}

/// Yields the accepted nodes, in expansion order.
impl<P, H, Sp, St, A, C> Iterator for AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    type Item = Expansion<St, C>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.outcome.is_none() {
            let mut accepted = None;
            self.step(&mut FnSink(|e: &Expansion<St, C>| accepted = Some(*e)));
            if accepted.is_some() {
                return accepted;
            }
        }
        None
    }
}
