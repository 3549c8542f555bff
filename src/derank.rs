// Arg-min over the children of a heap node.
//
// Sifting down a d-ary heap needs the best of up to `d` siblings. Instead of a
// left-to-right scan we run a tournament, which keeps the comparisons
// independent of each other within a round.
//
// 0   1   2   3
// *   *   *   *
//  \ /     \ /
//   *       *
//    \     /
//       *

/// Core comparison and index selection.
///
/// Ties go to the left, so a tournament over equal elements picks the first.
#[inline(always)]
#[must_use]
fn fight<T: PartialOrd>(a: &[T], l: usize, r: usize) -> usize {
    if a[l] <= a[r] { l } else { r }
}

/// Winner of `a[lo..hi]`.
#[inline(always)]
#[must_use]
fn tournament<T: PartialOrd>(a: &[T], lo: usize, hi: usize) -> usize {
    debug_assert!(lo < hi);
    match hi - lo {
        1 => lo,
        2 => fight(a, lo, lo + 1),
        n => {
            // Left half gets the extra element, so ties still favour the left.
            let mid = lo + n.div_ceil(2);
            fight(a, tournament(a, lo, mid), tournament(a, mid, hi))
        }
    }
}

/// Index of the minimum element of a non-empty slice.
///
/// ```
/// use windy_puzzle::derank::derank;
/// assert_eq!(derank(&[3, 1, 2]), 1);
/// assert_eq!(derank(&[2, 2, 1, 1]), 2);
/// assert_eq!(derank(&[7]), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn derank<T: PartialOrd>(a: &[T]) -> usize {
    debug_assert!(!a.is_empty(), "Can't derank an empty slice");
    tournament(a, 0, a.len())
}

pub fn linear_min_index<T: PartialOrd>(xs: &[T]) -> usize {
    assert!(!xs.is_empty());

    let mut min_i = 0;
    for (i, x) in xs.iter().enumerate() {
        if *x < xs[min_i] {
            min_i = i;
        }
    }
    min_i
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn small_slices() {
        assert_eq!(derank(&[0u8]), 0);
        assert_eq!(derank(&[1u8, 0u8]), 1);
        assert_eq!(derank(&[1u8, 0u8, 4u8, 3u8, 2u8]), 1);
        assert_eq!(derank(&[1u8, 5u8, 4u8, 6u8, 3u8, 7u8, 0u8]), 6);
    }

    #[test]
    fn ties_pick_the_first() {
        assert_eq!(derank(&[1u8, 1u8, 1u8]), 0);
        assert_eq!(derank(&[4u8, 2u8, 3u8, 2u8, 2u8]), 1);
        assert_eq!(derank(&[(1u8, 2u8), (0u8, 9u8), (0u8, 3u8)]), 2);
    }

    #[test]
    fn matches_linear_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for len in 1..=16 {
            for _ in 0..64 {
                let a: Vec<u8> = (0..len).map(|_| rng.random_range(0..8)).collect();
                assert_eq!(derank(&a), linear_min_index(&a), "{a:?}");
            }
        }
    }
}
