pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + std::hash::Hash
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }
}

/// Costs used by the sliding-tile puzzles.
///
/// Wind costs are small positive integers, so the sum of a whole path plus the
/// heuristic comfortably fits.
pub type PuzzleCost = u32;
impl Cost for PuzzleCost {}
