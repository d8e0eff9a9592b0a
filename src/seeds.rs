//! Seed data: a built-in question bank so the service is usable without a TOML bank.

use uuid::Uuid;

use crate::config::QuestionCfg;
use crate::domain::{Difficulty, Part, Question};
use crate::util::unix_now;

fn q(id: &str, part: Part, category: &str, theme: Option<&str>, difficulty: Difficulty, text: &str) -> Question {
  Question {
    id: id.into(),
    part,
    category: category.into(),
    subcategory: None,
    theme_group: theme.map(str::to_string),
    difficulty,
    tags: Vec::new(),
    text: text.into(),
    bullet_points: Vec::new(),
    created_at: 0,
  }
}

fn cue(id: &str, category: &str, theme: &str, text: &str, bullets: &[&str]) -> Question {
  Question {
    bullet_points: bullets.iter().map(|b| b.to_string()).collect(),
    ..q(id, Part::Two, category, Some(theme), Difficulty::Medium, text)
  }
}

/// Minimal built-in bank: four Part 1 categories, cue cards and linked Part 3 follow-ups.
pub fn seed_questions() -> Vec<Question> {
  use Difficulty::*;
  use Part::*;
  vec![
    q("p1-work-1", One, "Work/Studies", None, Easy, "Do you work or are you a student?"),
    q("p1-work-2", One, "Work/Studies", None, Easy, "Why did you choose that job or subject?"),
    q("p1-work-3", One, "Work/Studies", None, Medium, "What do you find most difficult about it?"),
    q("p1-work-4", One, "Work/Studies", None, Medium, "Would you like to change your job or subject in the future?"),
    q("p1-home-1", One, "Hometown", None, Easy, "Where is your hometown?"),
    q("p1-home-2", One, "Hometown", None, Easy, "What do you like most about it?"),
    q("p1-home-3", One, "Hometown", None, Medium, "How has your hometown changed in recent years?"),
    q("p1-home-4", One, "Hometown", None, Medium, "Is it a good place for young people to live?"),
    q("p1-free-1", One, "Free time", None, Easy, "What do you usually do at the weekend?"),
    q("p1-free-2", One, "Free time", None, Easy, "Do you prefer spending free time alone or with friends?"),
    q("p1-free-3", One, "Free time", None, Medium, "Have your hobbies changed since you were a child?"),
    q("p1-free-4", One, "Free time", None, Hard, "Do you think people today have less free time than before?"),
    q("p1-tech-1", One, "Technology", None, Easy, "How often do you use your phone?"),
    q("p1-tech-2", One, "Technology", None, Medium, "Which app do you use the most?"),
    q("p1-tech-3", One, "Technology", None, Medium, "Did you use computers when you were young?"),
    q("p1-tech-4", One, "Technology", None, Hard, "Is there any technology you would like to learn to use?"),
    cue(
      "p2-places-1",
      "Places",
      "places",
      "Describe a place in your city where you like to relax.",
      &["where it is", "how often you go there", "what you do there", "and explain why you find it relaxing"],
    ),
    cue(
      "p2-places-2",
      "Places",
      "places",
      "Describe a historic building you have visited.",
      &["what it is", "where it is", "what you learned there", "and explain how you felt about it"],
    ),
    cue(
      "p2-tech-1",
      "Technology",
      "technology",
      "Describe a piece of technology you find useful.",
      &["what it is", "when you got it", "how you use it", "and explain why it is useful to you"],
    ),
    cue(
      "p2-people-1",
      "People",
      "people",
      "Describe a person who has influenced you.",
      &["who the person is", "how you know them", "what they did", "and explain how they influenced you"],
    ),
    q("p3-places-1", Three, "Places", Some("places"), Medium, "Why do people like to visit public parks?"),
    q("p3-places-2", Three, "Places", Some("places"), Medium, "Should governments spend more on public spaces?"),
    q("p3-places-3", Three, "Places", Some("places"), Hard, "How do cities balance development with preserving old buildings?"),
    q("p3-places-4", Three, "Places", Some("places"), Medium, "Are quiet places harder to find in cities today?"),
    q("p3-places-5", Three, "Places", Some("places"), Hard, "What makes a city pleasant to live in?"),
    q("p3-places-6", Three, "Places", Some("places"), Medium, "Do tourists and locals value the same places?"),
    q("p3-tech-1", Three, "Technology", Some("technology"), Medium, "How has technology changed the way people communicate?"),
    q("p3-tech-2", Three, "Technology", Some("technology"), Hard, "Do you think people rely too much on technology?"),
    q("p3-tech-3", Three, "Technology", Some("technology"), Medium, "Should children be taught programming at school?"),
    q("p3-tech-4", Three, "Technology", Some("technology"), Hard, "Will technology create more jobs than it removes?"),
    q("p3-people-1", Three, "People", Some("people"), Medium, "What qualities make someone a good role model?"),
    q("p3-people-2", Three, "People", Some("people"), Hard, "Do celebrities have a responsibility to behave well?"),
    q("p3-gen-1", Three, "Society", None, Medium, "How are young people different from their parents' generation?"),
    q("p3-gen-2", Three, "Society", None, Hard, "What are the advantages of living in a big city?"),
  ]
}

/// Convert TOML bank entries; entries without an id get a fresh uuid.
pub fn questions_from_config(entries: &[QuestionCfg]) -> Vec<Question> {
  let now = unix_now();
  entries
    .iter()
    .map(|e| Question {
      id: e.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
      part: e.part,
      category: e.category.clone(),
      subcategory: e.subcategory.clone(),
      theme_group: e.theme_group.clone(),
      difficulty: e.difficulty,
      tags: e.tags.clone(),
      text: e.text.clone(),
      bullet_points: e.bullet_points.clone(),
      created_at: now,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn seed_ids_are_unique_and_cover_every_part() {
    let qs = seed_questions();
    let ids: HashSet<&str> = qs.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), qs.len());
    for part in Part::ALL {
      assert!(qs.iter().any(|q| q.part == part), "no part {part}");
    }
  }

  #[test]
  fn every_cue_card_theme_has_follow_ups() {
    let qs = seed_questions();
    for card in qs.iter().filter(|q| q.part == Part::Two) {
      let theme = card.theme_group.as_deref();
      assert!(qs.iter().any(|q| q.part == Part::Three && q.theme_group.as_deref() == theme));
    }
  }
}
