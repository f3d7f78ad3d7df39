//! Cell states, tree levels, and neighborhood variable orderings.
//!
//! A rule tree binds its input variables one at a time. The [`Level`] of a
//! node counts how many variables are still unbound below it, so the root of
//! a tree over `n` variables sits at level `n` and the rows holding leaf
//! states sit at level 1.
use std::fmt;

/// A cell state, always in `0..num_states`.
///
/// States double as input variable values and as transition outputs.
pub type State = u32;

/// Largest number of input variables a tree may have.
///
/// Building and rewriting trees descends one level per variable, so this
/// bounds the recursion depth.
pub const MAX_VARS: usize = 256;

/// A level in the rule tree (number of variables left to bind).
///
/// # Invariants
///
/// - Level 0 is the leaf level and never has a row of its own.
/// - A node at level `k > 1` only points to nodes at level `k - 1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Level(u32);

impl Level {
    /// The level of the leaves.
    pub const LEAF: Level = Level(0);

    /// Creates a new level with the given number of unbound variables.
    pub const fn new(level: u32) -> Self {
        Level(level)
    }

    /// Returns the raw level tag as written in the table format.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the level tag as an index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the level one step closer to the leaves, or `None` at the leaf level.
    pub fn below(self) -> Option<Self> {
        self.0.checked_sub(1).map(Level)
    }

    /// Returns the level one step closer to the root.
    pub fn above(self) -> Self {
        Level(self.0 + 1)
    }

    /// Checks whether the children at this level are leaf states.
    pub fn has_leaf_children(self) -> bool {
        self.0 == 1
    }

    /// Input position of the variable bound at this level, for a tree over `num_vars` variables.
    ///
    /// Binding proceeds from position 0 at the root to position `num_vars - 1` at level 1.
    pub fn position(self, num_vars: usize) -> usize {
        debug_assert!(self.0 >= 1 && self.index() <= num_vars);
        num_vars - self.index()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl From<u32> for Level {
    fn from(level: u32) -> Self {
        Level(level)
    }
}

/// A cell position relative to the center cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

/// Standard neighborhoods and their input variable orderings.
///
/// The ordering is part of the contract with whoever consumes the table:
///
/// ```text
/// VonNeumann:  N, W, E, S, C
/// Moore:       NW, NE, SW, SE, N, W, E, S, C
/// ```
///
/// The center cell is always bound last, so the level-1 rows discriminate
/// on the center state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Neighborhood {
    VonNeumann,
    Moore,
}

const VON_NEUMANN_ORDER: [Direction; 5] = [
    Direction::North,
    Direction::West,
    Direction::East,
    Direction::South,
    Direction::Center,
];

const MOORE_ORDER: [Direction; 9] = [
    Direction::NorthWest,
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::SouthEast,
    Direction::North,
    Direction::West,
    Direction::East,
    Direction::South,
    Direction::Center,
];

impl Neighborhood {
    /// Number of neighbor cells (the center excluded).
    pub fn num_neighbors(self) -> usize {
        self.order().len() - 1
    }

    /// Number of input variables (neighbors plus center).
    pub fn num_vars(self) -> usize {
        self.order().len()
    }

    /// Input variable ordering.
    pub fn order(self) -> &'static [Direction] {
        match self {
            Neighborhood::VonNeumann => &VON_NEUMANN_ORDER,
            Neighborhood::Moore => &MOORE_ORDER,
        }
    }

    /// Input position of the given cell, or `None` if it is not part of this neighborhood.
    pub fn position(self, direction: Direction) -> Option<usize> {
        self.order().iter().position(|&d| d == direction)
    }

    /// Input position of the center cell.
    pub fn center(self) -> usize {
        self.num_vars() - 1
    }

    /// Looks up the neighborhood with the given neighbor count.
    pub fn from_num_neighbors(num_neighbors: usize) -> Option<Self> {
        match num_neighbors {
            4 => Some(Neighborhood::VonNeumann),
            8 => Some(Neighborhood::Moore),
            _ => None,
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Neighborhood::VonNeumann => write!(f, "vonNeumann"),
            Neighborhood::Moore => write!(f, "Moore"),
        }
    }
}
