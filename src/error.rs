//! Error taxonomy for the selection engine and its HTTP surface.
//!
//! Under-supply (too few questions) is never an error; it degrades to repetition
//! or a shorter list inside the engine.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure raised by a repository backend. Propagated unchanged, never retried.
#[derive(Debug, Error)]
pub enum StoreError {
  // Raised by persistent backends; the memory stores never fail.
  #[allow(dead_code)]
  #[error("store unavailable: {0}")]
  Unavailable(String),
  #[error("duplicate key: {0}")]
  Duplicate(String),
  #[error("invalid value: {0}")]
  Invalid(String),
}

#[derive(Debug, Error)]
pub enum PracticeError {
  #[error("user not found: {0}")]
  UserNotFound(String),
  #[error("user already exists: {0}")]
  DuplicateUser(String),
  #[error("invalid request: {0}")]
  InvalidRequest(String),
  #[error(transparent)]
  Store(StoreError),
}

impl From<StoreError> for PracticeError {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::Duplicate(key) => PracticeError::DuplicateUser(key),
      StoreError::Invalid(msg) => PracticeError::InvalidRequest(msg),
      other => PracticeError::Store(other),
    }
  }
}

impl PracticeError {
  pub fn status(&self) -> StatusCode {
    match self {
      PracticeError::UserNotFound(_) => StatusCode::NOT_FOUND,
      PracticeError::DuplicateUser(_) => StatusCode::CONFLICT,
      PracticeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
      PracticeError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for PracticeError {
  fn into_response(self) -> axum::response::Response {
    let status = self.status();
    if status.is_server_error() {
      error!(target: "practice_backend", error = %self, "Request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
