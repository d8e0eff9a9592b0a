//! Question selection engine.
//!
//! - `SelectionEngine::select_unseen` : unseen-first draw with a hard fallback to the full pool
//! - `balancer`                       : optional cross-category spreading of a draw
//! - `assembler`                      : composes a full three-part test
//!
//! The engine is stateless between calls: stores, ledger and dice are injected.
//! Nothing here writes the usage ledger except `complete_test`.

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, instrument};

use crate::config::SelectionCfg;
use crate::dice::Dice;
use crate::domain::{Part, Question};
use crate::error::StoreError;
use crate::store::{QuestionFilter, QuestionStore, UsageLedger, UserDirectory};

pub mod assembler;
pub mod balancer;

use balancer::select_across_categories;

/// Options for a single unseen draw.
#[derive(Clone, Debug, Default)]
pub struct SelectOptions {
  pub category: Option<String>,
  /// Spread the draw across categories when the pool is large enough.
  pub spread_categories: bool,
}

#[derive(Clone)]
pub struct SelectionEngine {
  pub(crate) questions: Arc<dyn QuestionStore>,
  pub(crate) usage: Arc<dyn UsageLedger>,
  pub(crate) users: Arc<dyn UserDirectory>,
  pub(crate) dice: Arc<Dice>,
  pub(crate) shape: SelectionCfg,
}

impl SelectionEngine {
  pub fn new(
    questions: Arc<dyn QuestionStore>,
    usage: Arc<dyn UsageLedger>,
    users: Arc<dyn UserDirectory>,
    dice: Arc<Dice>,
    shape: SelectionCfg,
  ) -> Self {
    Self { questions, usage, users, dice, shape }
  }

  pub fn questions(&self) -> &Arc<dyn QuestionStore> {
    &self.questions
  }

  pub fn users(&self) -> &Arc<dyn UserDirectory> {
    &self.users
  }

  /// Unseen pool for `filter` if it holds at least `count` items, otherwise the
  /// full pool (seen questions become eligible again). No partial exclusion.
  #[instrument(level = "debug", skip(self, seen), fields(seen = seen.len()))]
  pub(crate) async fn draw_with_fallback(
    &self,
    filter: &QuestionFilter,
    seen: &HashSet<String>,
    count: usize,
  ) -> Result<Vec<Question>, StoreError> {
    let unseen = self.questions.find(filter, seen).await?;
    if unseen.len() >= count {
      return Ok(unseen);
    }
    let full = self.questions.find(filter, &HashSet::new()).await?;
    debug!(target: "selection", ?filter, count, unseen = unseen.len(), full = full.len(), "Unseen pool too small; allowing repeats");
    Ok(full)
  }

  /// Up to `count` questions for `part` the user has not seen yet.
  /// The result may be shorter than `count` when the pool itself is smaller.
  #[instrument(level = "info", skip(self, options), fields(category = ?options.category, spread = options.spread_categories))]
  pub async fn select_unseen(
    &self,
    user_id: &str,
    part: Part,
    count: usize,
    options: &SelectOptions,
  ) -> Result<Vec<Question>, StoreError> {
    if count == 0 {
      return Ok(Vec::new());
    }
    let seen = self.usage.seen_by(user_id).await?;
    self.select_unseen_with(&seen, part, count, options).await
  }

  /// Same as `select_unseen` with an already-loaded seen set.
  pub(crate) async fn select_unseen_with(
    &self,
    seen: &HashSet<String>,
    part: Part,
    count: usize,
    options: &SelectOptions,
  ) -> Result<Vec<Question>, StoreError> {
    if count == 0 {
      return Ok(Vec::new());
    }
    let filter = QuestionFilter::Part { part, category: options.category.clone() };
    let pool = self.draw_with_fallback(&filter, seen, count).await?;

    if options.spread_categories && pool.len() >= count {
      debug!(target: "selection", %part, count, pool = pool.len(), "Balancing draw across categories");
      return Ok(select_across_categories(pool, count, &self.dice));
    }
    Ok(self.dice.shuffle_take(pool, count))
  }
}
