use alloc::collections::VecDeque;
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Returns an integer in `[min, max]`, both ends inclusive.
    fn uniform_int(&mut self, min: usize, max: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        (**self).uniform_int(min, max)
    }
}

/// Default random source, a `SmallRng` seeded from a single `u64`.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max, "empty range {min}..={max}");
        self.rng.random_range(min..=max)
    }
}

/// Replays a fixed list of draws, each clamped into the requested range, then keeps returning `min`.
///
/// Useful to pin down a bomb position or an iteration order exactly.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(draws: &[usize]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform_int(&mut self, min: usize, max: usize) -> usize {
        self.draws.pop_front().unwrap_or(min).clamp(min, max)
    }
}

/// Inside-Out shuffle step: adds `item` to `order` so that after `k` calls the sequence is a uniform permutation of
/// the `k` items pushed so far, without knowing the final length up front.
pub fn inside_out_push<T, R>(order: &mut Vec<T>, item: T, rng: &mut R)
where
    T: Clone,
    R: RandomSource + ?Sized,
{
    let len = order.len();
    let pick = rng.uniform_int(0, len);
    if pick == len {
        order.push(item);
    } else {
        let displaced = order[pick].clone();
        order.push(displaced);
        order[pick] = item;
    }
}

/// In-place Fisher-Yates shuffle, from the last index down to 1.
pub fn fisher_yates_shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let pick = rng.uniform_int(0, i);
        items.swap(i, pick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec;

    #[test]
    fn uniform_int_stays_within_inclusive_bounds() {
        let mut rng = SeededRandom::new(7);
        let mut seen_min = false;
        let mut seen_max = false;

        for _ in 0..1000 {
            let value = rng.uniform_int(3, 6);
            assert!((3..=6).contains(&value));
            seen_min |= value == 3;
            seen_max |= value == 6;
        }

        assert!(seen_min && seen_max);
    }

    #[test]
    fn same_seed_replays_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);

        for _ in 0..32 {
            assert_eq!(a.uniform_int(0, 100), b.uniform_int(0, 100));
        }
    }

    #[test]
    fn inside_out_push_follows_draws() {
        // draws: 0 -> append, 0 -> displace slot 0, 2 -> append
        let mut rng = ScriptedRandom::new(&[0, 0, 2]);
        let mut order = Vec::new();

        for item in ['a', 'b', 'c'] {
            inside_out_push(&mut order, item, &mut rng);
        }

        assert_eq!(order, vec!['b', 'a', 'c']);
    }

    #[test]
    fn inside_out_push_is_uniform() {
        const TRIALS: usize = 60_000;
        let mut rng = SeededRandom::new(0xb0b);
        let mut counts: BTreeMap<Vec<u8>, usize> = BTreeMap::new();

        for _ in 0..TRIALS {
            let mut order = Vec::with_capacity(3);
            for item in 0..3u8 {
                inside_out_push(&mut order, item, &mut rng);
            }
            *counts.entry(order).or_default() += 1;
        }

        // 3! orderings, each expected TRIALS / 6 = 10_000 times; stddev is about 91
        assert_eq!(counts.len(), 6);
        for (order, count) in counts {
            assert!(
                count.abs_diff(TRIALS / 6) < 600,
                "ordering {order:?} seen {count} times"
            );
        }
    }

    #[test]
    fn fisher_yates_permutes_in_place() {
        let mut rng = SeededRandom::new(11);
        let mut items: Vec<u16> = (0..50).collect();

        fisher_yates_shuffle(&mut items, &mut rng);

        assert_ne!(items, (0..50).collect::<Vec<_>>());
        items.sort_unstable();
        assert_eq!(items, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn fisher_yates_swaps_from_the_back() {
        // i = 2 picks 0, i = 1 picks 1
        let mut rng = ScriptedRandom::new(&[0, 1]);
        let mut items = ['a', 'b', 'c'];

        fisher_yates_shuffle(&mut items, &mut rng);

        assert_eq!(items, ['c', 'b', 'a']);
    }
}
