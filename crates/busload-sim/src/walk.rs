//! Biased random walk over passenger count.

use rand::Rng;

/// Probability that a step is an entry rather than an exit.
pub const ENTRY_PROBABILITY: f64 = 0.6;

/// Occupancy that drifts upward: each step is an entry with probability
/// [`ENTRY_PROBABILITY`] (ignored when full), otherwise an exit (ignored when
/// empty). The count always stays within `0..=capacity`.
pub struct RandomWalk<R> {
  count:    u32,
  capacity: u32,
  rng:      R,
}

impl<R: Rng> RandomWalk<R> {
  /// Start an empty bus with `capacity` seats.
  pub fn new(capacity: u32, rng: R) -> Self { Self { count: 0, capacity, rng } }

  pub fn capacity(&self) -> u32 { self.capacity }

  /// Advance one step and return the new count.
  pub fn step(&mut self) -> u32 {
    if self.rng.gen_bool(ENTRY_PROBABILITY) {
      if self.count < self.capacity {
        self.count += 1;
      }
    } else if self.count > 0 {
      self.count -= 1;
    }
    self.count
  }
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn walk(capacity: u32, seed: u64) -> RandomWalk<StdRng> {
    RandomWalk::new(capacity, StdRng::seed_from_u64(seed))
  }

  #[test]
  fn stays_within_bounds() {
    let mut w = walk(40, 7);
    for _ in 0..10_000 {
      let c = w.step();
      assert!(c <= 40);
    }
  }

  #[test]
  fn moves_at_most_one_per_step() {
    let mut w = walk(40, 11);
    let mut prev = 0;
    for _ in 0..1_000 {
      let c = w.step();
      assert!(c.abs_diff(prev) <= 1);
      prev = c;
    }
  }

  #[test]
  fn zero_capacity_never_moves() {
    let mut w = walk(0, 3);
    assert!((0..100).all(|_| w.step() == 0));
  }

  #[test]
  fn drifts_upward() {
    let mut w = walk(10_000, 42);
    let last = (0..1_000).map(|_| w.step()).last().unwrap();
    assert!(last > 50, "count after 1000 steps: {last}");
  }

  #[test]
  fn same_seed_same_walk() {
    let mut a = walk(40, 99);
    let mut b = walk(40, 99);
    let xs: Vec<u32> = (0..60).map(|_| a.step()).collect();
    let ys: Vec<u32> = (0..60).map(|_| b.step()).collect();
    assert_eq!(xs, ys);
  }
}
