//! Application state: repositories, random source and the selection engine.
//!
//! This module owns:
//!   - the in-memory question store (TOML bank first, then built-in seeds)
//!   - the usage ledger and user directory
//!   - the dice (seeded from SELECTION_SEED / config when present)
//!
//! Handlers only talk to `SelectionEngine`; swapping the memory backends for a
//! database means providing other implementations of the store traits.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::config::{load_practice_config_from_env, seed_from_env, PracticeConfig};
use crate::dice::Dice;
use crate::domain::Part;
use crate::seeds::{questions_from_config, seed_questions};
use crate::selection::SelectionEngine;
use crate::store::{MemoryQuestionStore, MemoryUsageLedger, MemoryUserDirectory, UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub engine: SelectionEngine,
}

impl AppState {
    /// Build state from env: load config, seed questions and users, init dice.
    #[instrument(level = "info", skip_all)]
    pub async fn from_env() -> Self {
        let cfg = load_practice_config_from_env().unwrap_or_default();
        let seed = seed_from_env().or(cfg.selection.seed);
        Self::from_config(cfg, Dice::from_seed_opt(seed)).await
    }

    /// `cfg.selection` is used as given; `parse_practice_config` already normalized it.
    pub async fn from_config(cfg: PracticeConfig, dice: Dice) -> Self {
        // Bank entries go first so they win over built-in seeds with the same id.
        let mut questions = questions_from_config(&cfg.questions);
        questions.extend(seed_questions());
        let store = MemoryQuestionStore::new(questions);

        let by_part = store.count_by_part().await;
        for part in Part::ALL {
            let n = by_part.get(&part).copied().unwrap_or(0);
            info!(target: "selection", %part, questions = n, "Startup question inventory");
        }
        let total = store.len().await;
        info!(target: "selection", total, bank = cfg.questions.len(), "Question store ready");

        let users = MemoryUserDirectory::default();
        for u in &cfg.users {
            match users.register(&u.email, u.name.clone()).await {
                Ok(user) => info!(target: "practice_backend", email = %user.email, id = %user.id, "Registered configured user"),
                Err(e) => error!(target: "practice_backend", email = %u.email, error = %e, "Skipping configured user"),
            }
        }

        let engine = SelectionEngine::new(
            Arc::new(store),
            Arc::new(MemoryUsageLedger::default()),
            Arc::new(users),
            Arc::new(dice),
            cfg.selection,
        );
        Self { engine }
    }
}
