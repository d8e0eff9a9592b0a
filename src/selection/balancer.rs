//! Category balancer: spread a draw across categories instead of letting it cluster.
//!
//! Round-robin with reset: a category is not revisited until every non-empty
//! category has been used once in the current pass, then the pass starts over.
//! Consecutive picks from the same category are possible right after a reset.

use std::collections::{BTreeMap, HashSet};

use crate::dice::Dice;
use crate::domain::Question;

pub fn select_across_categories(questions: Vec<Question>, count: usize, dice: &Dice) -> Vec<Question> {
  // BTreeMap keeps category order stable so seeded draws are reproducible.
  let mut by_category: BTreeMap<String, Vec<Question>> = BTreeMap::new();
  for q in questions {
    by_category.entry(q.category.clone()).or_default().push(q);
  }

  let mut used: HashSet<String> = HashSet::new();
  let mut out = Vec::with_capacity(count);

  while out.len() < count {
    let mut available: Vec<&String> = by_category
      .iter()
      .filter(|(cat, pool)| !pool.is_empty() && !used.contains(*cat))
      .map(|(cat, _)| cat)
      .collect();
    if available.is_empty() {
      used.clear();
      available = by_category
        .iter()
        .filter(|(_, pool)| !pool.is_empty())
        .map(|(cat, _)| cat)
        .collect();
      if available.is_empty() {
        break;
      }
    }

    let category = available[dice.index(available.len())].clone();
    if let Some(pool) = by_category.get_mut(&category) {
      let picked = pool.swap_remove(dice.index(pool.len()));
      out.push(picked);
    }
    used.insert(category);
  }

  out.truncate(count);
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Part;
  use crate::store::tests::question;

  fn pool(per_category: &[(&str, usize)]) -> Vec<Question> {
    per_category
      .iter()
      .flat_map(|(cat, n)| (0..*n).map(move |i| question(&format!("{cat}-{i}"), Part::One, cat, None)))
      .collect()
  }

  #[test]
  fn first_pass_covers_distinct_categories() {
    let dice = Dice::seeded(3);
    let out = select_across_categories(pool(&[("Work", 5), ("Home", 5), ("Food", 5), ("Sport", 5)]), 4, &dice);
    let cats: HashSet<&str> = out.iter().map(|q| q.category.as_str()).collect();
    assert_eq!(out.len(), 4);
    assert_eq!(cats.len(), 4);
  }

  #[test]
  fn resets_when_categories_run_out() {
    let dice = Dice::seeded(11);
    let out = select_across_categories(pool(&[("Work", 3), ("Home", 3)]), 5, &dice);
    assert_eq!(out.len(), 5);
    // Each pair of picks (one pass) uses both categories.
    for pass in out.chunks(2).filter(|c| c.len() == 2) {
      assert_ne!(pass[0].category, pass[1].category);
    }
    let ids: HashSet<&str> = out.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
  }

  #[test]
  fn skips_drained_categories() {
    let dice = Dice::seeded(5);
    let out = select_across_categories(pool(&[("Work", 1), ("Home", 4)]), 4, &dice);
    assert_eq!(out.len(), 4);
    assert_eq!(out.iter().filter(|q| q.category == "Work").count(), 1);
  }

  #[test]
  fn stops_when_everything_is_used() {
    let dice = Dice::seeded(9);
    assert_eq!(select_across_categories(pool(&[("Work", 2)]), 6, &dice).len(), 2);
    assert!(select_across_categories(Vec::new(), 3, &dice).is_empty());
  }
}
