//! Injectable random source shared by every selection step.
//!
//! Production uses an entropy-seeded generator; tests and `SELECTION_SEED` pin it.

use std::sync::{Mutex, MutexGuard};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

pub struct Dice {
  rng: Mutex<StdRng>,
}

impl Dice {
  pub fn from_entropy() -> Self {
    Self { rng: Mutex::new(StdRng::from_entropy()) }
  }

  pub fn seeded(seed: u64) -> Self {
    Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
  }

  pub fn from_seed_opt(seed: Option<u64>) -> Self {
    seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
  }

  // A panic while holding the lock cannot leave the generator in a bad state.
  fn rng(&self) -> MutexGuard<'_, StdRng> {
    self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Full Fisher-Yates shuffle in place.
  pub fn shuffle<T>(&self, items: &mut [T]) {
    items.shuffle(&mut *self.rng());
  }

  /// Shuffle then keep the first `n` (all of them if fewer exist).
  pub fn shuffle_take<T>(&self, mut items: Vec<T>, n: usize) -> Vec<T> {
    self.shuffle(&mut items);
    items.truncate(n);
    items
  }

  /// Uniform integer in `[lo, hi]`. Returns `lo` when the range is empty.
  pub fn between(&self, lo: usize, hi: usize) -> usize {
    if hi <= lo {
      return lo;
    }
    self.rng().gen_range(lo..=hi)
  }

  /// Uniform index below `len`; `len` must be non-zero.
  pub fn index(&self, len: usize) -> usize {
    self.rng().gen_range(0..len)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seeded_dice_are_reproducible() {
    let a = Dice::seeded(7);
    let b = Dice::seeded(7);
    let xs: Vec<u32> = (0..20).collect();
    assert_eq!(a.shuffle_take(xs.clone(), 5), b.shuffle_take(xs, 5));
    assert_eq!(a.between(4, 6), b.between(4, 6));
  }

  #[test]
  fn between_stays_inclusive() {
    let d = Dice::seeded(1);
    let mut seen = [false; 3];
    for _ in 0..200 {
      let v = d.between(4, 6);
      assert!((4..=6).contains(&v));
      seen[v - 4] = true;
    }
    assert!(seen.iter().all(|s| *s));
    assert_eq!(d.between(3, 3), 3);
  }

  #[test]
  fn shuffle_take_handles_short_input() {
    let d = Dice::seeded(2);
    let mut out = d.shuffle_take(vec![1, 2, 3], 10);
    out.sort();
    assert_eq!(out, vec![1, 2, 3]);
  }
}
