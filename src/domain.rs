//! Domain models: speaking-test parts, questions, usage records and the assembled test bundle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Section of the speaking test a question belongs to.
/// Serialized as the bare number (1, 2 or 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Part {
  /// Warm-up questions about familiar topics.
  One,
  /// A single cue card the candidate talks about at length.
  Two,
  /// Follow-up discussion linked to the cue card's theme.
  Three,
}

impl Part {
  pub const ALL: [Part; 3] = [Part::One, Part::Two, Part::Three];

  pub fn number(self) -> u8 {
    match self {
      Part::One => 1,
      Part::Two => 2,
      Part::Three => 3,
    }
  }
}

impl TryFrom<u8> for Part {
  type Error = String;

  fn try_from(n: u8) -> Result<Self, Self::Error> {
    match n {
      1 => Ok(Part::One),
      2 => Ok(Part::Two),
      3 => Ok(Part::Three),
      other => Err(format!("part must be 1, 2 or 3 (got {other})")),
    }
  }
}

impl From<Part> for u8 {
  fn from(p: Part) -> u8 { p.number() }
}

impl fmt::Display for Part {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.number())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

/// A question record. Loaded once at startup and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: String,
  pub part: Part,
  pub category: String,
  #[serde(default)] pub subcategory: Option<String>,
  /// Links a Part 2 cue card to its Part 3 follow-ups (e.g. "places").
  #[serde(default)] pub theme_group: Option<String>,
  #[serde(default)] pub difficulty: Difficulty,
  #[serde(default)] pub tags: Vec<String>,
  pub text: String,
  // Part 2 cue cards only
  #[serde(default)] pub bullet_points: Vec<String>,
  pub created_at: u64,
}

/// One (user, question) pair in the usage ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
  pub user_id: String,
  pub question_id: String,
  pub created_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: String,
  pub email: String,
  #[serde(default)] pub name: Option<String>,
}

/// The three-part test handed to a candidate.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TestBundle {
  pub part1: Vec<Question>,
  /// `None` only when no Part 2 question exists at all.
  pub part2: Option<Question>,
  pub part3: Vec<Question>,
}

impl TestBundle {
  /// Every question id in delivery order (part 1, part 2, part 3).
  pub fn question_ids(&self) -> Vec<String> {
    self.part1
      .iter()
      .chain(self.part2.iter())
      .chain(self.part3.iter())
      .map(|q| q.id.clone())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn part_serializes_as_number() {
    assert_eq!(serde_json::to_string(&Part::Two).unwrap(), "2");
    let p: Part = serde_json::from_str("3").unwrap();
    assert_eq!(p, Part::Three);
    assert!(serde_json::from_str::<Part>("4").is_err());
  }

  #[test]
  fn bundle_ids_follow_delivery_order() {
    let q = |id: &str, part| Question {
      id: id.into(),
      part,
      category: "Work".into(),
      subcategory: None,
      theme_group: None,
      difficulty: Difficulty::Easy,
      tags: vec![],
      text: String::new(),
      bullet_points: vec![],
      created_at: 0,
    };
    let bundle = TestBundle {
      part1: vec![q("a", Part::One), q("b", Part::One)],
      part2: Some(q("c", Part::Two)),
      part3: vec![q("d", Part::Three)],
    };
    assert_eq!(bundle.question_ids(), vec!["a", "b", "c", "d"]);
  }
}
