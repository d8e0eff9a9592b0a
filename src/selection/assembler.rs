//! Theme-linked test assembly and the post-test "mark as used" step.
//!
//! Flow:
//! 1) Resolve the user, pick one unseen Part 2 cue card.
//! 2) Part 3 follow-ups come from the cue card's theme group when it has enough,
//!    otherwise from the generic Part 3 pool.
//! 3) Part 1 is drawn from 1..=3 random categories with a fixed, order-dependent split.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use super::{SelectOptions, SelectionEngine};
use crate::domain::{Part, Question, TestBundle};
use crate::error::PracticeError;
use crate::store::QuestionFilter;

/// Per-theme question counts for `themes` themes sharing `total` questions.
///
/// 1 theme takes everything; 2 themes split ceil(60%) / rest; 3 themes split
/// ceil(50%), then ceil(60%) of what remains, then the rest. The first theme
/// always gets the largest share.
pub fn split_counts(total: usize, themes: usize) -> Vec<usize> {
  match themes {
    0 => Vec::new(),
    1 => vec![total],
    2 => {
      let first = ceil_pct(total, 60);
      vec![first, total - first]
    }
    _ => {
      let first = ceil_pct(total, 50);
      let rest = total - first;
      let second = ceil_pct(rest, 60);
      vec![first, second, rest - second]
    }
  }
}

// ceil(n * pct / 100) without floating point.
fn ceil_pct(n: usize, pct: usize) -> usize {
  (n * pct).div_ceil(100)
}

impl SelectionEngine {
  /// Compose a full three-part test for the user behind `email`.
  /// Read-only: the caller marks questions as used once the test is scored.
  #[instrument(level = "info", skip(self))]
  pub async fn assemble_test(&self, email: &str) -> Result<TestBundle, PracticeError> {
    let user = self
      .users
      .find_by_email(email)
      .await?
      .ok_or_else(|| PracticeError::UserNotFound(email.to_string()))?;
    let seen = self.usage.seen_by(&user.id).await?;

    let part2 = self
      .select_unseen_with(&seen, Part::Two, 1, &SelectOptions::default())
      .await?
      .into_iter()
      .next();
    if part2.is_none() {
      warn!(target: "selection", user = %user.id, "No Part 2 questions available");
    }
    let theme = part2.as_ref().and_then(|q| q.theme_group.clone());

    let part3 = self.pick_part3(&seen, theme.as_deref()).await?;
    let part1 = self.pick_part1(&seen).await?;

    info!(
      target: "selection",
      user = %user.id,
      part1 = part1.len(),
      part2 = ?part2.as_ref().map(|q| q.id.as_str()),
      theme = ?theme,
      part3 = part3.len(),
      "Assembled test"
    );
    Ok(TestBundle { part1, part2, part3 })
  }

  async fn pick_part3(&self, seen: &HashSet<String>, theme: Option<&str>) -> Result<Vec<Question>, PracticeError> {
    let target = self.dice.between(self.shape.part3_min, self.shape.part3_max);

    let mut pool = match theme {
      Some(theme_group) => {
        let filter = QuestionFilter::Theme { part: Part::Three, theme_group: theme_group.to_string() };
        self.draw_with_fallback(&filter, seen, target).await?
      }
      None => Vec::new(),
    };

    if pool.len() < target {
      debug!(target: "selection", ?theme, target, themed = pool.len(), "Theme too small for Part 3; using generic pool");
      pool = self.select_unseen_with(seen, Part::Three, target, &SelectOptions::default()).await?;
    }

    Ok(self.dice.shuffle_take(pool, target))
  }

  async fn pick_part1(&self, seen: &HashSet<String>) -> Result<Vec<Question>, PracticeError> {
    let target = self.dice.between(self.shape.part1_min, self.shape.part1_max);
    let theme_count = self.dice.between(self.shape.themes_min, self.shape.themes_max);

    let categories = self.questions.categories(Part::One).await?;
    let themes = self.dice.shuffle_take(categories, theme_count);
    let counts = split_counts(target, themes.len());
    debug!(target: "selection", target, ?themes, ?counts, "Part 1 theme split");

    let mut out = Vec::with_capacity(target);
    for (theme, n) in themes.into_iter().zip(counts) {
      let options = SelectOptions { category: Some(theme), spread_categories: false };
      out.extend(self.select_unseen_with(seen, Part::One, n, &options).await?);
    }
    Ok(out)
  }

  /// Record every delivered question as seen by the user. Safe to repeat:
  /// pairs that already exist are skipped. Returns the number of new rows.
  #[instrument(level = "info", skip(self, question_ids), fields(questions = question_ids.len()))]
  pub async fn complete_test(&self, email: &str, question_ids: &[String]) -> Result<usize, PracticeError> {
    let user = self
      .users
      .find_by_email(email)
      .await?
      .ok_or_else(|| PracticeError::UserNotFound(email.to_string()))?;

    let missing = self.questions.missing_ids(question_ids).await?;
    if !missing.is_empty() {
      return Err(PracticeError::InvalidRequest(format!("unknown question ids: {}", missing.join(", "))));
    }

    let inserted = self.usage.mark_used(&user.id, question_ids).await?;
    info!(target: "selection", user = %user.id, inserted, skipped = question_ids.len() - inserted, "Marked questions as used");
    Ok(inserted)
  }
}
