//! The 3x3 sliding-tile puzzle under wind.
//!
//! Moving the blank costs depend on the direction it moves, and the blank is
//! charged the wind blowing *against* the tile it swaps with. A blank moving
//! West slides a tile East, so it pays the East wind.

use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

use crate::algorithms::astar::AStarSearch;
use crate::cost::PuzzleCost;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::Space;
use crate::space::State;

pub const SIDE: usize = 3;
pub const CELLS: usize = SIDE * SIDE;
pub const BLANK: u8 = 0;

/// Number of States reachable from any Board (half of `9!`).
pub const REACHABLE_STATES: usize = 181_440;

// Random walks give up looking for a non-backtracking move after this many
// draws. Every cell has at least 2 legal moves, so this is never hit.
const RANDOM_MOVE_MAX_TRIES: usize = 64;

/// A cell of the board.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("({row},{col})")]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

/// Converts a linear cell index into its `(row, col)`.
///
/// ```
/// use windy_puzzle::problems::eight_puzzle::index_to_coord;
/// assert_eq!(index_to_coord(0).row, 0);
/// assert_eq!(index_to_coord(5).row, 1);
/// assert_eq!(index_to_coord(5).col, 2);
/// assert_eq!(index_to_coord(8).col, 2);
/// ```
#[inline(always)]
#[must_use]
pub const fn index_to_coord(i: usize) -> Coord {
    debug_assert!(i < CELLS);
    Coord {
        row: i / SIDE,
        col: i % SIDE,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("Expected {expected} tiles, got {0}", expected = CELLS)]
    WrongLength(usize),
    #[error("Tile {0} is out of range (0..={max})", max = CELLS - 1)]
    TileOutOfRange(u8),
    #[error("Tile {0} appears more than once")]
    DuplicateTile(u8),
    #[error("Invalid tile '{0}'")]
    InvalidToken(String),
}

/// A 3x3 arrangement of the tiles `0..=8`, with `0` as the blank.
///
/// Always a permutation; the only way to build one is through validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Board {
    tiles: [u8; CELLS],
}
impl State for Board {}

impl Board {
    pub fn new(tiles: [u8; CELLS]) -> Result<Self, InvalidStateError> {
        let mut seen = [false; CELLS];
        for &t in &tiles {
            let slot = seen
                .get_mut(t as usize)
                .ok_or(InvalidStateError::TileOutOfRange(t))?;
            if *slot {
                return Err(InvalidStateError::DuplicateTile(t));
            }
            *slot = true;
        }
        Ok(Self { tiles })
    }

    /// The solved board, `1..=8` in reading order with the blank last.
    pub fn solved() -> Self {
        Self {
            tiles: [1, 2, 3, 4, 5, 6, 7, 8, BLANK],
        }
    }

    #[inline(always)]
    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    #[inline(always)]
    pub fn tile(&self, i: usize) -> u8 {
        self.tiles[i]
    }

    /// Where `tile` currently is.
    #[inline(always)]
    pub fn position_of(&self, tile: u8) -> usize {
        debug_assert!((tile as usize) < CELLS);
        // Boards are permutations, so every tile is somewhere.
        self.tiles
            .iter()
            .position(|&t| t == tile)
            .unwrap_or_default()
    }

    /// Where the blank is.
    #[inline(always)]
    pub fn blank(&self) -> usize {
        self.position_of(BLANK)
    }

    /// Swaps two cells, which keeps the permutation.
    #[inline(always)]
    #[must_use]
    fn swapped(&self, i: usize, j: usize) -> Self {
        let mut tiles = self.tiles;
        tiles.swap(i, j);
        Self { tiles }
    }

    /// Number of tile pairs out of order, ignoring the blank.
    pub fn inversions(&self) -> usize {
        let tiles: Vec<u8> = self.tiles.iter().copied().filter(|&t| t != BLANK).collect();
        let mut count = 0;
        for (i, a) in tiles.iter().enumerate() {
            count += tiles[i + 1..].iter().filter(|b| a > b).count();
        }
        count
    }

    /// Whether `other` can be reached by sliding tiles.
    ///
    /// On odd-width boards sliding never changes the inversion parity, and
    /// every board with the same parity is reachable.
    pub fn same_parity_as(&self, other: &Board) -> bool {
        self.inversions() % 2 == other.inversions() % 2
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::solved()
    }
}

impl TryFrom<[u8; CELLS]> for Board {
    type Error = InvalidStateError;

    fn try_from(tiles: [u8; CELLS]) -> Result<Self, Self::Error> {
        Self::new(tiles)
    }
}

impl TryFrom<&[u8]> for Board {
    type Error = InvalidStateError;

    fn try_from(tiles: &[u8]) -> Result<Self, Self::Error> {
        let tiles: [u8; CELLS] = tiles
            .try_into()
            .map_err(|_| InvalidStateError::WrongLength(tiles.len()))?;
        Self::new(tiles)
    }
}

impl FromStr for Board {
    type Err = InvalidStateError;

    /// Parses 9 tiles separated by whitespace or commas.
    ///
    /// The blank may be written as `0`, `-` or `_`, so printed boards parse
    /// back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiles = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| match token {
                "-" | "_" => Ok(BLANK),
                token => token
                    .parse::<u8>()
                    .map_err(|_| InvalidStateError::InvalidToken(token.to_string())),
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Board::try_from(tiles.as_slice())
    }
}

impl std::fmt::Display for Board {
    /// Rows on separate lines, blank drawn as `-`.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (row, cells) in self.tiles.chunks(SIDE).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, &t) in cells.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if t == BLANK {
                    write!(f, "-")?;
                } else {
                    write!(f, "{t}")?;
                }
            }
        }
        Ok(())
    }
}

/// Directions the blank moves in.
///
/// Declared in expansion order.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Move {
    #[display("←")]
    West = 0,
    #[display("↑")]
    North = 1,
    #[display("→")]
    East = 2,
    #[display("↓")]
    South = 3,
}
impl Action for Move {}

impl Move {
    pub const ALL: [Move; 4] = [Move::West, Move::North, Move::East, Move::South];

    /// Change in the blank's linear index.
    #[inline(always)]
    pub fn offset(&self) -> isize {
        match self {
            Move::West => -1,
            Move::North => -(SIDE as isize),
            Move::East => 1,
            Move::South => SIDE as isize,
        }
    }

    #[inline(always)]
    pub fn opposite(&self) -> Move {
        match self {
            Move::West => Move::East,
            Move::North => Move::South,
            Move::East => Move::West,
            Move::South => Move::North,
        }
    }

    /// Whether the blank can move this way from `blank`.
    #[inline(always)]
    pub fn legal_from(&self, blank: usize) -> bool {
        let Coord { row, col } = index_to_coord(blank);
        match self {
            Move::West => col != 0,
            Move::North => row != 0,
            Move::East => col != SIDE - 1,
            Move::South => row != SIDE - 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindError {
    #[error("Wind towards {0:?} must cost more than 0")]
    ZeroCost(Move),
    #[error("Missing wind towards {0:?}")]
    MissingDirection(Move),
    #[error("Unknown direction '{0}'")]
    UnknownDirection(String),
    #[error("Invalid cost '{cost}' for {direction:?}")]
    InvalidCost { direction: Move, cost: String },
    #[error("Wind towards {0:?} given more than once")]
    DuplicateDirection(Move),
    #[error("Malformed wind entry '{0}', expected <direction>=<cost>")]
    Malformed(String),
}

/// The cost of the wind blowing towards each direction.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("n={north},s={south},e={east},w={west}")]
pub struct Wind {
    north: PuzzleCost,
    south: PuzzleCost,
    east: PuzzleCost,
    west: PuzzleCost,
}

impl Wind {
    pub fn new(
        north: PuzzleCost,
        south: PuzzleCost,
        east: PuzzleCost,
        west: PuzzleCost,
    ) -> Result<Self, WindError> {
        for (direction, cost) in [
            (Move::North, north),
            (Move::South, south),
            (Move::East, east),
            (Move::West, west),
        ] {
            if cost == 0 {
                return Err(WindError::ZeroCost(direction));
            }
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// Every direction costs the same.
    pub fn calm(cost: PuzzleCost) -> Result<Self, WindError> {
        Self::new(cost, cost, cost, cost)
    }

    /// The wind blowing towards `direction`.
    #[inline(always)]
    pub fn towards(&self, direction: Move) -> PuzzleCost {
        match direction {
            Move::North => self.north,
            Move::South => self.south,
            Move::East => self.east,
            Move::West => self.west,
        }
    }

    /// What moving the blank costs.
    ///
    /// The displaced tile travels the opposite way, so that's the wind paid.
    #[inline(always)]
    pub fn charge(&self, blank_move: Move) -> PuzzleCost {
        self.towards(blank_move.opposite())
    }
}

fn parse_direction(s: &str) -> Result<Move, WindError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "n" | "north" => Ok(Move::North),
        "s" | "south" => Ok(Move::South),
        "e" | "east" => Ok(Move::East),
        "w" | "west" => Ok(Move::West),
        _ => Err(WindError::UnknownDirection(s.trim().to_string())),
    }
}

impl FromStr for Wind {
    type Err = WindError;

    /// Parses `n=2,s=2,e=3,w=1` in any order, full direction names allowed.
    /// Each direction must appear exactly once.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut costs: [Option<PuzzleCost>; 4] = [None; 4];

        for entry in s.split([',', ' ']).filter(|e| !e.trim().is_empty()) {
            let (direction, cost) = entry
                .split_once('=')
                .ok_or_else(|| WindError::Malformed(entry.to_string()))?;
            let direction = parse_direction(direction)?;
            let cost = cost
                .trim()
                .parse::<PuzzleCost>()
                .map_err(|_| WindError::InvalidCost {
                    direction,
                    cost: cost.trim().to_string(),
                })?;
            if costs[direction as usize].replace(cost).is_some() {
                return Err(WindError::DuplicateDirection(direction));
            }
        }

        let get = |direction: Move| costs[direction as usize].ok_or(WindError::MissingDirection(direction));
        Wind::new(
            get(Move::North)?,
            get(Move::South)?,
            get(Move::East)?,
            get(Move::West)?,
        )
    }
}

/// The tiles-out-of-place plus wind-weighted Manhattan distance.
///
/// Each tile is charged the wind it would have to travel with to reach its
/// goal cell, plus one more if it's misplaced at all. Neither admissible nor
/// consistent in general.
#[derive(Clone, Debug)]
pub struct WindHeuristic {
    goal: Board,
    /// Goal cell of each tile, indexed by tile.
    goal_coords: [Coord; CELLS],
    wind: Wind,
}

impl WindHeuristic {
    pub fn new(goal: Board, wind: Wind) -> Self {
        let mut goal_coords = [Coord { row: 0, col: 0 }; CELLS];
        for (i, &t) in goal.tiles().iter().enumerate() {
            goal_coords[t as usize] = index_to_coord(i);
        }

        Self {
            goal,
            goal_coords,
            wind,
        }
    }

    #[inline(always)]
    pub fn goal_coord(&self, tile: u8) -> Coord {
        self.goal_coords[tile as usize]
    }

    /// Non-blank tiles not on their goal cell.
    pub fn tiles_out_of_place(&self, s: &Board) -> PuzzleCost {
        s.tiles()
            .iter()
            .zip(self.goal.tiles())
            .filter(|&(&t, &g)| t != BLANK && t != g)
            .count() as PuzzleCost
    }

    /// Wind cost of pushing `tile` from cell `i` straight to its goal.
    #[inline(always)]
    pub fn tile_distance(&self, tile: u8, i: usize) -> PuzzleCost {
        if tile == BLANK {
            return 0;
        }
        let current = index_to_coord(i);
        let goal = self.goal_coord(tile);
        let row_steps = current.row.abs_diff(goal.row) as PuzzleCost;
        let col_steps = current.col.abs_diff(goal.col) as PuzzleCost;

        #[rustfmt::skip]
        let row_cost = match goal.row.cmp(&current.row) {
            std::cmp::Ordering::Greater => row_steps.saturating_mul(self.wind.towards(Move::South)),
            std::cmp::Ordering::Less    => row_steps.saturating_mul(self.wind.towards(Move::North)),
            std::cmp::Ordering::Equal   => 0,
        };
        #[rustfmt::skip]
        let col_cost = match goal.col.cmp(&current.col) {
            std::cmp::Ordering::Greater => col_steps.saturating_mul(self.wind.towards(Move::East)),
            std::cmp::Ordering::Less    => col_steps.saturating_mul(self.wind.towards(Move::West)),
            std::cmp::Ordering::Equal   => 0,
        };

        row_cost.saturating_add(col_cost)
    }

    /// Saturates at `PuzzleCost::MAX`, as path costs do.
    pub fn weighted_manhattan(&self, s: &Board) -> PuzzleCost {
        s.tiles()
            .iter()
            .enumerate()
            .map(|(i, &t)| self.tile_distance(t, i))
            .fold(0, PuzzleCost::saturating_add)
    }
}

impl Heuristic<Board, PuzzleCost> for WindHeuristic {
    #[inline(always)]
    fn h(&self, s: &Board) -> PuzzleCost {
        self.tiles_out_of_place(s)
            .saturating_add(self.weighted_manhattan(s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EightPuzzleSpace {
    wind: Wind,
}

impl EightPuzzleSpace {
    pub fn new(wind: Wind) -> Self {
        Self { wind }
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    /// Takes `steps` random moves from `start`, never undoing the last one.
    pub fn random_walk<R: rand::Rng>(&self, r: &mut R, start: Board, steps: usize) -> Board {
        let mut board = start;
        let mut last: Option<Move> = None;

        for _step in 0..steps {
            let moves = self.neighbours(&board);
            for _tries in 0..RANDOM_MOVE_MAX_TRIES {
                let (next, m) = moves[r.random_range(0..moves.len())];
                if last != Some(m.opposite()) {
                    board = next;
                    last = Some(m);
                    break;
                }
            }
        }

        board
    }
}

impl Space<Board, Move, PuzzleCost> for EightPuzzleSpace {
    #[inline(always)]
    fn apply(&self, s: &Board, a: &Move) -> Option<Board> {
        let blank = s.blank();
        if !a.legal_from(blank) {
            return None;
        }
        let target = blank.checked_add_signed(a.offset())?;
        Some(s.swapped(blank, target))
    }

    #[inline(always)]
    fn cost(&self, _s: &Board, a: &Move) -> PuzzleCost {
        self.wind.charge(*a)
    }

    /// Slides the blank West, North, East and South, skipping the edges.
    fn neighbours(&self, s: &Board) -> Neighbours<Board, Move> {
        let mut v = Neighbours::<Board, Move>::new();
        let blank = s.blank();

        for m in Move::ALL {
            if !m.legal_from(blank) {
                continue;
            }
            // Legal moves stay on the board.
            if let Some(target) = blank.checked_add_signed(m.offset()) {
                v.push((s.swapped(blank, target), m));
            }
        }
        v
    }

    #[inline(always)]
    fn valid(&self, s: &Board) -> bool {
        Board::new(*s.tiles()).is_ok()
    }

    fn size(&self) -> Option<usize> {
        Some(2 * REACHABLE_STATES)
    }
}

#[derive(Clone, Debug)]
pub struct EightPuzzleProblem {
    space: EightPuzzleSpace,
    initial: Board,
    goal: Board,
}

impl EightPuzzleProblem {
    pub fn new(initial: Board, goal: Board, wind: Wind) -> Self {
        Self {
            space: EightPuzzleSpace::new(wind),
            initial,
            goal,
        }
    }

    /// Builds a problem from raw tiles, failing on anything that isn't a
    /// permutation of `0..=8`.
    pub fn from_tiles(
        initial: [u8; CELLS],
        goal: [u8; CELLS],
        wind: Wind,
    ) -> Result<Self, InvalidStateError> {
        Ok(Self::new(Board::new(initial)?, Board::new(goal)?, wind))
    }

    pub fn initial(&self) -> &Board {
        &self.initial
    }

    pub fn wind(&self) -> &Wind {
        self.space.wind()
    }

    /// Whether the goal is reachable at all.
    pub fn is_solvable(&self) -> bool {
        self.initial.same_parity_as(&self.goal)
    }

    pub fn heuristic(&self) -> WindHeuristic {
        WindHeuristic::new(self.goal, *self.space.wind())
    }

    /// Sets up A* with the windy heuristic.
    pub fn into_search(self) -> EightPuzzleSearch {
        if !self.is_solvable() {
            log::warn!(
                "{:?} can't reach {:?}, the search will exhaust all {REACHABLE_STATES} states",
                self.initial,
                self.goal
            );
        }
        let heuristic = self.heuristic();
        EightPuzzleSearch::new(self, heuristic)
    }

    /// A solvable variant whose start is a random walk away from the goal.
    pub fn randomize<R: rand::Rng>(&self, r: &mut R, steps: usize) -> EightPuzzleProblem {
        let initial = self.space.random_walk(r, self.goal, steps);
        EightPuzzleProblem {
            space: self.space.clone(),
            initial,
            goal: self.goal,
        }
    }
}

pub type EightPuzzleSearch =
    AStarSearch<EightPuzzleProblem, WindHeuristic, EightPuzzleSpace, Board, Move, PuzzleCost>;

impl Problem<EightPuzzleSpace, Board, Move, PuzzleCost> for EightPuzzleProblem {
    fn space(&self) -> &EightPuzzleSpace {
        &self.space
    }
    fn start(&self) -> &Board {
        &self.initial
    }
    fn goal(&self) -> &Board {
        &self.goal
    }
}

impl std::fmt::Display for EightPuzzleProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "EightPuzzle(wind: {}):", self.space.wind())?;
        let initial = self.initial.to_string();
        let goal = self.goal.to_string();
        for (i, (s, g)) in initial.lines().zip(goal.lines()).enumerate() {
            let arrow = if i == SIDE / 2 { "=>" } else { "  " };
            writeln!(f, "{s}  {arrow}  {g}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    fn board(tiles: [u8; CELLS]) -> Board {
        Board::new(tiles).unwrap()
    }

    fn windy() -> Wind {
        "w=1,n=2,e=3,s=2".parse().unwrap()
    }

    fn sample_problem() -> EightPuzzleProblem {
        EightPuzzleProblem::from_tiles(
            [1, 6, 2, 5, 7, 8, 0, 4, 3],
            [7, 8, 1, 6, 0, 2, 5, 4, 3],
            windy(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_permutations() {
        assert_eq!(
            Board::new([1, 1, 2, 3, 4, 5, 6, 7, 8]),
            Err(InvalidStateError::DuplicateTile(1))
        );
        assert_eq!(
            Board::new([0, 1, 2, 3, 4, 5, 6, 7, 9]),
            Err(InvalidStateError::TileOutOfRange(9))
        );
        assert_eq!(
            Board::try_from(&[0u8, 1, 2][..]),
            Err(InvalidStateError::WrongLength(3))
        );
        assert_eq!(
            "1 2 3 4 5 6 7 8 x".parse::<Board>(),
            Err(InvalidStateError::InvalidToken("x".to_string()))
        );
        assert_eq!(
            "1 2 3 4 5 6 7 8".parse::<Board>(),
            Err(InvalidStateError::WrongLength(8))
        );
    }

    #[test]
    fn parses_and_prints() {
        let b = board([1, 6, 2, 5, 7, 8, 0, 4, 3]);
        let printed = indoc! {"
            1 6 2
            5 7 8
            - 4 3"};
        assert_eq!(b.to_string(), printed);
        assert_eq!(printed.parse::<Board>(), Ok(b));
        assert_eq!("1,6,2,5,7,8,0,4,3".parse::<Board>(), Ok(b));
        assert_eq!("1 6 2 5 7 8 _ 4 3".parse::<Board>(), Ok(b));
    }

    #[test]
    fn blank_and_coordinates() {
        let b = board([1, 6, 2, 5, 7, 8, 0, 4, 3]);
        assert_eq!(b.blank(), 6);
        assert_eq!(index_to_coord(b.blank()), Coord { row: 2, col: 0 });
        assert_eq!(b.position_of(8), 5);
        for i in 0..CELLS {
            let Coord { row, col } = index_to_coord(i);
            assert_eq!(row * SIDE + col, i);
        }
    }

    #[test]
    fn wind_parsing() {
        let w = windy();
        assert_eq!(w, Wind::new(2, 2, 3, 1).unwrap());
        assert_eq!(w.to_string(), "n=2,s=2,e=3,w=1");
        assert_eq!(w.to_string().parse::<Wind>(), Ok(w));
        assert_eq!("west=1, North=2, east=3, south=2".parse::<Wind>(), Ok(w));

        assert_eq!(
            "n=2,s=2,e=3".parse::<Wind>(),
            Err(WindError::MissingDirection(Move::West))
        );
        assert_eq!(
            "n=2,s=2,e=3,w=0".parse::<Wind>(),
            Err(WindError::ZeroCost(Move::West))
        );
        assert_eq!(
            "n=2,s=2,e=3,up=1".parse::<Wind>(),
            Err(WindError::UnknownDirection("up".to_string()))
        );
        assert_eq!(
            "n=2,s=2,e=3,w".parse::<Wind>(),
            Err(WindError::Malformed("w".to_string()))
        );
        assert_eq!(
            "n=1,s=2,e=3,w=1,n=5".parse::<Wind>(),
            Err(WindError::DuplicateDirection(Move::North))
        );
        assert_eq!(
            "north=1,s=2,e=3,w=1,N=5".parse::<Wind>(),
            Err(WindError::DuplicateDirection(Move::North))
        );
        assert!(matches!(
            "n=2,s=2,e=3,w=-1".parse::<Wind>(),
            Err(WindError::InvalidCost { direction: Move::West, .. })
        ));
    }

    #[test]
    fn blank_pays_the_opposite_wind() {
        let w = windy();
        assert_eq!(w.charge(Move::West), 3);
        assert_eq!(w.charge(Move::North), 2);
        assert_eq!(w.charge(Move::East), 1);
        assert_eq!(w.charge(Move::South), 2);
    }

    #[test]
    fn sample_heuristic() {
        let p = sample_problem();
        let h = p.heuristic();
        let initial = *p.initial();

        assert_eq!(h.tiles_out_of_place(&initial), 6);
        assert_eq!(h.weighted_manhattan(&initial), 19);
        assert_eq!(h.h(&initial), 25);
        assert_eq!(h.h(&initial), h.h(&initial));
    }

    #[test]
    fn strong_wind_saturates() {
        let gale = Wind::new(3_000_000_000, 1, 1, 1).unwrap();
        let p = EightPuzzleProblem::from_tiles(
            [1, 6, 2, 5, 7, 8, 0, 4, 3],
            [7, 8, 1, 6, 0, 2, 5, 4, 3],
            gale,
        )
        .unwrap();
        let h = p.heuristic();

        // Tiles 7 and 8 each need one step North.
        assert_eq!(h.tile_distance(7, 4), 3_000_000_001);
        assert_eq!(h.weighted_manhattan(p.initial()), PuzzleCost::MAX);
        assert_eq!(h.h(p.initial()), PuzzleCost::MAX);
        assert_eq!(h.h(p.goal()), 0);

        let mut search = p.into_search().with_expansion_limit(50);
        let mut trace: Vec<crate::report::Expansion<Board, PuzzleCost>> = vec![];
        let _ = search.explore(&mut trace);
        assert!(!trace.is_empty());
        assert!(trace.iter().all(|e| e.f() >= e.g && e.f() >= e.h));
    }

    #[test]
    fn goal_has_no_heuristic() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let space = EightPuzzleSpace::new(windy());
        for _ in 0..50 {
            let goal = space.random_walk(&mut rng, Board::solved(), 40);
            let h = WindHeuristic::new(goal, windy());
            assert_eq!(h.h(&goal), 0);
        }
    }

    #[test]
    fn expansion_order_and_costs() {
        let p = sample_problem();
        let initial = *p.initial();
        let children = p.space().neighbours(&initial);

        // Blank in the bottom-left corner: only North and East.
        let moves: Vec<Move> = children.iter().map(|(_, m)| *m).collect();
        assert_eq!(moves, vec![Move::North, Move::East]);
        assert_eq!(children[0].0, board([1, 6, 2, 0, 7, 8, 5, 4, 3]));
        assert_eq!(children[1].0, board([1, 6, 2, 5, 7, 8, 4, 0, 3]));

        let h = p.heuristic();
        assert_eq!(p.space().cost(&initial, &Move::North), 2);
        assert_eq!(h.h(&children[0].0), 22);
        assert_eq!(p.space().cost(&initial, &Move::East), 1);
        assert_eq!(h.h(&children[1].0), 29);
    }

    #[test]
    fn corners_have_two_moves() {
        let space = EightPuzzleSpace::new(windy());
        let top_left = board([0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let moves: Vec<Move> = space.neighbours(&top_left).iter().map(|(_, m)| *m).collect();
        assert_eq!(moves, vec![Move::East, Move::South]);

        let bottom_right = board([1, 2, 3, 4, 5, 6, 7, 8, 0]);
        let moves: Vec<Move> = space
            .neighbours(&bottom_right)
            .iter()
            .map(|(_, m)| *m)
            .collect();
        assert_eq!(moves, vec![Move::West, Move::North]);

        let centre = board([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        assert_eq!(space.neighbours(&centre).len(), 4);
        assert_eq!(space.apply(&top_left, &Move::West), None);
        assert_eq!(space.apply(&top_left, &Move::North), None);
    }

    #[test]
    fn expansions_stay_permutations() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let space = EightPuzzleSpace::new(windy());
        for _ in 0..100 {
            let s = space.random_walk(&mut rng, Board::solved(), 30);
            for (child, m) in space.neighbours(&s) {
                assert!(space.valid(&child));
                let mut tiles = *child.tiles();
                tiles.sort();
                assert_eq!(tiles, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
                assert_eq!(space.apply(&s, &m), Some(child));
                assert_eq!(space.apply(&child, &m.opposite()), Some(s));
            }
        }
    }

    #[test]
    fn heuristic_changes_by_one_tile() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let space = EightPuzzleSpace::new(windy());
        let goal = space.random_walk(&mut rng, Board::solved(), 25);
        let h = WindHeuristic::new(goal, windy());

        for _ in 0..100 {
            let s = space.random_walk(&mut rng, goal, 20);
            let blank = s.blank();
            for (child, _) in space.neighbours(&s) {
                // The tile that moved now sits where the blank was.
                let tile = child.tile(blank);
                let from = s.position_of(tile);

                let misplaced = |i: usize| (goal.tile(i) != tile) as i64;
                let delta = (h.tile_distance(tile, blank) as i64 + misplaced(blank))
                    - (h.tile_distance(tile, from) as i64 + misplaced(from));

                assert_eq!(h.h(&child) as i64 - h.h(&s) as i64, delta);
            }
        }
    }

    #[test]
    fn parity() {
        let p = sample_problem();
        assert!(p.is_solvable());

        let swapped = board([2, 1, 3, 4, 5, 6, 7, 8, 0]);
        assert!(!swapped.same_parity_as(&Board::solved()));
        assert_eq!(Board::solved().inversions(), 0);
        assert_eq!(swapped.inversions(), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let scrambled = p.randomize(&mut rng, 60);
        assert!(scrambled.is_solvable());
        assert_eq!(scrambled.goal(), p.goal());
    }

    #[test]
    fn random_walks_are_seeded() {
        let p = sample_problem();
        let a = p.randomize(&mut ChaCha8Rng::seed_from_u64(1), 30);
        let b = p.randomize(&mut ChaCha8Rng::seed_from_u64(1), 30);
        assert_eq!(a.initial(), b.initial());
    }

    #[test]
    fn problem_display() {
        let p = sample_problem();
        let expected = indoc! {"
            EightPuzzle(wind: n=2,s=2,e=3,w=1):
            1 6 2      7 8 1
            5 7 8  =>  6 - 2
            - 4 3      5 4 3
        "};
        assert_eq!(p.to_string(), expected);
    }
}
