//! Public HTTP request/response structs (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Part, Question, TestBundle, User};

/// DTO for question delivery. Internal bookkeeping (timestamps) stays server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: String,
    pub part: Part,
    pub category: String,
    pub subcategory: Option<String>,
    pub theme_group: Option<String>,
    pub difficulty: Difficulty,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bullet_points: Vec<String>,
    pub tags: Vec<String>,
}

/// Convert full `Question` (internal) to the public DTO.
pub fn to_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        part: q.part,
        category: q.category.clone(),
        subcategory: q.subcategory.clone(),
        theme_group: q.theme_group.clone(),
        difficulty: q.difficulty,
        text: q.text.clone(),
        bullet_points: q.bullet_points.clone(),
        tags: q.tags.clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct TestOut {
    pub part1: Vec<QuestionOut>,
    pub part2: Option<QuestionOut>,
    pub part3: Vec<QuestionOut>,
}

pub fn test_to_out(t: &TestBundle) -> TestOut {
    TestOut {
        part1: t.part1.iter().map(to_out).collect(),
        part2: t.part2.as_ref().map(to_out),
        part3: t.part3.iter().map(to_out).collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct NewTestIn {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTestIn {
    pub email: String,
    pub question_ids: Vec<String>,
}
#[derive(Debug, Serialize)]
pub struct CompleteTestOut {
    pub inserted: usize,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub email: String,
    /// Kept as a raw number so an out-of-range part yields a 400 with a clear message.
    pub part: u8,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub spread: bool,
}
fn default_count() -> usize {
    1
}
#[derive(Serialize)]
pub struct QuestionsOut {
    pub questions: Vec<QuestionOut>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    #[serde(default = "default_part")]
    pub part: u8,
}
fn default_part() -> u8 {
    1
}
#[derive(Serialize)]
pub struct CategoriesOut {
    pub part: Part,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterIn {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}
pub type UserOut = User;

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
