//! HTTP endpoint handlers. These are thin wrappers that forward to the selection engine.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::domain::Part;
use crate::error::PracticeError;
use crate::protocol::*;
use crate::selection::SelectOptions;
use crate::state::AppState;

/// Largest single draw accepted by `/questions`.
const MAX_DRAW: usize = 50;

fn parse_part(n: u8) -> Result<Part, PracticeError> {
  Part::try_from(n).map_err(PracticeError::InvalidRequest)
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_post_user(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RegisterIn>,
) -> Result<impl IntoResponse, PracticeError> {
  let user: UserOut = state.engine.users().register(&body.email, body.name).await?;
  info!(target: "practice_backend", id = %user.id, email = %user.email, "HTTP user registered");
  Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_post_test(
  State(state): State<Arc<AppState>>,
  Json(body): Json<NewTestIn>,
) -> Result<impl IntoResponse, PracticeError> {
  let bundle = state.engine.assemble_test(&body.email).await?;
  info!(target: "selection", email = %body.email, questions = bundle.question_ids().len(), "HTTP test served");
  Ok(Json(test_to_out(&bundle)))
}

#[instrument(level = "info", skip(state, body), fields(email = %body.email, questions = body.question_ids.len()))]
pub async fn http_post_complete(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CompleteTestIn>,
) -> Result<impl IntoResponse, PracticeError> {
  let inserted = state.engine.complete_test(&body.email, &body.question_ids).await?;
  Ok(Json(CompleteTestOut { inserted }))
}

#[instrument(level = "info", skip(state), fields(email = %q.email, part = q.part, count = q.count))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionsQuery>,
) -> Result<impl IntoResponse, PracticeError> {
  let part = parse_part(q.part)?;
  if q.count > MAX_DRAW {
    return Err(PracticeError::InvalidRequest(format!("count must be at most {MAX_DRAW}")));
  }
  let user = state
    .engine
    .users()
    .find_by_email(&q.email)
    .await?
    .ok_or_else(|| PracticeError::UserNotFound(q.email.clone()))?;

  let options = SelectOptions { category: q.category, spread_categories: q.spread };
  let questions = state.engine.select_unseen(&user.id, part, q.count, &options).await?;
  info!(target: "selection", %part, requested = q.count, served = questions.len(), "HTTP questions served");
  Ok(Json(QuestionsOut { questions: questions.iter().map(to_out).collect() }))
}

#[instrument(level = "info", skip(state), fields(part = q.part))]
pub async fn http_get_categories(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CategoriesQuery>,
) -> Result<impl IntoResponse, PracticeError> {
  let part = parse_part(q.part)?;
  let categories = state.engine.questions().categories(part).await?;
  Ok(Json(CategoriesOut { part, categories }))
}
