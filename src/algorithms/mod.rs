//! Implementation of search algorithms.
//!
//! These algorithms can search generic problems.

pub mod astar;
