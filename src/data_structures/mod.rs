//! Containers backing the searches.

pub mod frontier;
