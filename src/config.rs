//! Loading practice configuration (selection shape + optional question bank + users) from TOML.
//!
//! See `PracticeConfig` and `SelectionCfg` for the expected schema.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{Difficulty, Part};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PracticeConfig {
  #[serde(default)]
  pub selection: SelectionCfg,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
  #[serde(default)]
  pub users: Vec<UserCfg>,
}

/// Shape of an assembled test. All ranges are inclusive.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectionCfg {
  pub part1_min: usize,
  pub part1_max: usize,
  pub part3_min: usize,
  pub part3_max: usize,
  pub themes_min: usize,
  pub themes_max: usize,
  /// Pins the random source; unseeded when absent.
  pub seed: Option<u64>,
}

impl Default for SelectionCfg {
  fn default() -> Self {
    Self {
      part1_min: 8,
      part1_max: 12,
      part3_min: 4,
      part3_max: 6,
      themes_min: 1,
      themes_max: 3,
      seed: None,
    }
  }
}

impl SelectionCfg {
  /// Repair inverted ranges and keep the theme count within 1..=3.
  pub fn normalized(mut self) -> Self {
    for (name, lo, hi) in [
      ("part1", &mut self.part1_min, &mut self.part1_max),
      ("part3", &mut self.part3_min, &mut self.part3_max),
    ] {
      if *lo > *hi {
        warn!(target: "practice_backend", range = name, min = *lo, max = *hi, "min above max; using min for both");
        *hi = *lo;
      }
    }
    let (lo, hi) = (self.themes_min.clamp(1, 3), self.themes_max.clamp(1, 3));
    if (lo, hi) != (self.themes_min, self.themes_max) {
      warn!(target: "practice_backend", min = self.themes_min, max = self.themes_max, "theme count outside 1..=3; clamped");
    }
    self.themes_min = lo;
    self.themes_max = hi.max(lo);
    self
  }
}

/// Question bank entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  pub part: Part,
  pub category: String,
  pub text: String,
  #[serde(default)] pub subcategory: Option<String>,
  #[serde(default)] pub theme_group: Option<String>,
  #[serde(default)] pub difficulty: Difficulty,
  #[serde(default)] pub tags: Vec<String>,
  #[serde(default)] pub bullet_points: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserCfg {
  pub email: String,
  #[serde(default)] pub name: Option<String>,
}

/// Attempt to load `PracticeConfig` from PRACTICE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_practice_config_from_env() -> Option<PracticeConfig> {
  let path = std::env::var("PRACTICE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_practice_config(&s) {
      Ok(cfg) => {
        info!(target: "practice_backend", %path, questions = cfg.questions.len(), users = cfg.users.len(), "Loaded practice config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "practice_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "practice_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_practice_config(s: &str) -> Result<PracticeConfig, toml::de::Error> {
  let mut cfg = toml::from_str::<PracticeConfig>(s)?;
  cfg.selection = cfg.selection.normalized();
  Ok(cfg)
}

/// SELECTION_SEED wins over the TOML seed.
pub fn seed_from_env() -> Option<u64> {
  let raw = std::env::var("SELECTION_SEED").ok()?;
  match raw.trim().parse::<u64>() {
    Ok(seed) => Some(seed),
    Err(e) => {
      warn!(target: "practice_backend", %raw, error = %e, "Ignoring unparsable SELECTION_SEED");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_bank_and_users() {
    let cfg = parse_practice_config(
      r#"
[selection]
part3_min = 5
seed = 42

[[questions]]
part = 2
category = "Places"
theme_group = "places"
text = "Describe a park you like to visit."
bullet_points = ["where it is", "what you do there"]

[[users]]
email = "demo@example.com"
"#,
    )
    .expect("config");

    assert_eq!(cfg.selection.part3_min, 5);
    assert_eq!(cfg.selection.part3_max, 6);
    assert_eq!(cfg.selection.seed, Some(42));
    assert_eq!(cfg.questions[0].part, Part::Two);
    assert_eq!(cfg.questions[0].difficulty, Difficulty::Medium);
    assert_eq!(cfg.users[0].name, None);
  }

  #[test]
  fn rejects_unknown_part() {
    assert!(parse_practice_config("[[questions]]\npart = 4\ncategory = \"x\"\ntext = \"y\"\n").is_err());
  }

  #[test]
  fn normalizes_bad_ranges() {
    let cfg = SelectionCfg { part1_min: 10, part1_max: 6, themes_min: 0, themes_max: 9, ..Default::default() }.normalized();
    assert_eq!((cfg.part1_min, cfg.part1_max), (10, 10));
    assert_eq!((cfg.themes_min, cfg.themes_max), (1, 3));
  }
}
