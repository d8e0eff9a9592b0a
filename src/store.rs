//! Repository seams used by the selection engine plus their in-memory backends.
//!
//! The engine only sees the traits:
//!   - `QuestionStore` : read-only question queries (with an id exclusion set)
//!   - `UsageLedger`   : append-only (user, question) pairs
//!   - `UserDirectory` : email -> user id resolution
//!
//! The in-memory versions keep their maps behind `Arc<RwLock<..>>`, the same way
//! the application state holds everything else.

use std::{
  collections::{BTreeSet, HashMap, HashSet},
  sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Part, Question, UsageRecord, User};
use crate::error::StoreError;
use crate::util::{normalize_email, unix_now};

/// Which slice of the question pool a query targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionFilter {
  Part { part: Part, category: Option<String> },
  Theme { part: Part, theme_group: String },
}

impl QuestionFilter {
  #[cfg(test)]
  pub fn part(part: Part) -> Self {
    QuestionFilter::Part { part, category: None }
  }

  pub fn matches(&self, q: &Question) -> bool {
    match self {
      QuestionFilter::Part { part, category } => {
        q.part == *part && category.as_deref().map_or(true, |c| q.category == c)
      }
      QuestionFilter::Theme { part, theme_group } => {
        q.part == *part && q.theme_group.as_deref() == Some(theme_group.as_str())
      }
    }
  }
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
  /// Questions matching `filter` whose id is not in `exclude`.
  async fn find(&self, filter: &QuestionFilter, exclude: &HashSet<String>) -> Result<Vec<Question>, StoreError>;

  /// Distinct categories present for `part`, sorted.
  async fn categories(&self, part: Part) -> Result<Vec<String>, StoreError>;

  /// Ids from `ids` that do not exist in the store.
  async fn missing_ids(&self, ids: &[String]) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
pub trait UsageLedger: Send + Sync {
  /// Question ids already served to the user.
  async fn seen_by(&self, user_id: &str) -> Result<HashSet<String>, StoreError>;

  /// Insert (user, question) pairs, skipping existing ones. Returns rows inserted.
  async fn mark_used(&self, user_id: &str, question_ids: &[String]) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

  async fn register(&self, email: &str, name: Option<String>) -> Result<User, StoreError>;
}

#[derive(Clone, Default)]
pub struct MemoryQuestionStore {
  questions: Arc<RwLock<Vec<Question>>>,
}

impl MemoryQuestionStore {
  /// Build from a list; later entries with an already-used id are dropped.
  pub fn new(questions: Vec<Question>) -> Self {
    let mut ids = HashSet::new();
    let unique: Vec<Question> = questions.into_iter().filter(|q| ids.insert(q.id.clone())).collect();
    Self { questions: Arc::new(RwLock::new(unique)) }
  }

  pub async fn len(&self) -> usize {
    self.questions.read().await.len()
  }

  pub async fn count_by_part(&self) -> HashMap<Part, usize> {
    let mut out = HashMap::new();
    for q in self.questions.read().await.iter() {
      *out.entry(q.part).or_insert(0) += 1;
    }
    out
  }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
  async fn find(&self, filter: &QuestionFilter, exclude: &HashSet<String>) -> Result<Vec<Question>, StoreError> {
    let questions = self.questions.read().await;
    Ok(questions
      .iter()
      .filter(|q| filter.matches(q) && !exclude.contains(&q.id))
      .cloned()
      .collect())
  }

  async fn categories(&self, part: Part) -> Result<Vec<String>, StoreError> {
    let questions = self.questions.read().await;
    let set: BTreeSet<&str> = questions
      .iter()
      .filter(|q| q.part == part)
      .map(|q| q.category.as_str())
      .collect();
    Ok(set.into_iter().map(str::to_string).collect())
  }

  async fn missing_ids(&self, ids: &[String]) -> Result<Vec<String>, StoreError> {
    let questions = self.questions.read().await;
    let known: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
    Ok(ids.iter().filter(|id| !known.contains(id.as_str())).cloned().collect())
  }
}

#[derive(Clone, Default)]
pub struct MemoryUsageLedger {
  // user_id -> records in insertion order
  records: Arc<RwLock<HashMap<String, Vec<UsageRecord>>>>,
}

impl MemoryUsageLedger {
  #[cfg(test)]
  pub async fn records_for(&self, user_id: &str) -> Vec<UsageRecord> {
    self.records.read().await.get(user_id).cloned().unwrap_or_default()
  }
}

#[async_trait]
impl UsageLedger for MemoryUsageLedger {
  async fn seen_by(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
    let records = self.records.read().await;
    Ok(records
      .get(user_id)
      .map(|rs| rs.iter().map(|r| r.question_id.clone()).collect())
      .unwrap_or_default())
  }

  async fn mark_used(&self, user_id: &str, question_ids: &[String]) -> Result<usize, StoreError> {
    let mut records = self.records.write().await;
    let rows = records.entry(user_id.to_string()).or_default();
    let mut present: HashSet<String> = rows.iter().map(|r| r.question_id.clone()).collect();
    let now = unix_now();
    let mut inserted = 0;
    for qid in question_ids {
      if present.insert(qid.clone()) {
        rows.push(UsageRecord { user_id: user_id.to_string(), question_id: qid.clone(), created_at: now });
        inserted += 1;
      }
    }
    Ok(inserted)
  }
}

#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
  // normalized email -> user
  by_email: Arc<RwLock<HashMap<String, User>>>,
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
    Ok(self.by_email.read().await.get(&normalize_email(email)).cloned())
  }

  async fn register(&self, email: &str, name: Option<String>) -> Result<User, StoreError> {
    let key = normalize_email(email);
    if key.is_empty() || !key.contains('@') {
      return Err(StoreError::Invalid(format!("not an email address: {email:?}")));
    }
    let mut users = self.by_email.write().await;
    if users.contains_key(&key) {
      return Err(StoreError::Duplicate(key));
    }
    let user = User { id: Uuid::new_v4().to_string(), email: key.clone(), name };
    users.insert(key, user.clone());
    Ok(user)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::domain::Difficulty;

  pub(crate) fn question(id: &str, part: Part, category: &str, theme: Option<&str>) -> Question {
    Question {
      id: id.into(),
      part,
      category: category.into(),
      subcategory: None,
      theme_group: theme.map(str::to_string),
      difficulty: Difficulty::Medium,
      tags: vec![],
      text: format!("question {id}"),
      bullet_points: vec![],
      created_at: 0,
    }
  }

  #[tokio::test]
  async fn find_applies_filter_and_exclusion() {
    let store = MemoryQuestionStore::new(vec![
      question("a", Part::One, "Work", None),
      question("b", Part::One, "Home", None),
      question("c", Part::Three, "Cities", Some("places")),
      question("d", Part::Three, "Tech", Some("technology")),
    ]);

    let all_p1 = store.find(&QuestionFilter::part(Part::One), &HashSet::new()).await.unwrap();
    assert_eq!(all_p1.len(), 2);

    let work = QuestionFilter::Part { part: Part::One, category: Some("Work".into()) };
    assert_eq!(store.find(&work, &HashSet::new()).await.unwrap()[0].id, "a");

    let places = QuestionFilter::Theme { part: Part::Three, theme_group: "places".into() };
    let excl: HashSet<String> = ["c".to_string()].into();
    assert!(store.find(&places, &excl).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn duplicate_ids_keep_first_entry() {
    let store = MemoryQuestionStore::new(vec![
      question("a", Part::One, "Work", None),
      question("a", Part::Two, "Home", None),
    ]);
    assert_eq!(store.len().await, 1);
    assert_eq!(store.categories(Part::One).await.unwrap(), vec!["Work"]);
    assert_eq!(store.missing_ids(&["a".into(), "zz".into()]).await.unwrap(), vec!["zz"]);
  }

  #[tokio::test]
  async fn mark_used_skips_duplicates() {
    let ledger = MemoryUsageLedger::default();
    let ids = vec!["q1".to_string(), "q2".to_string(), "q1".to_string()];
    assert_eq!(ledger.mark_used("u1", &ids).await.unwrap(), 2);
    assert_eq!(ledger.mark_used("u1", &ids).await.unwrap(), 0);
    assert_eq!(ledger.records_for("u1").await.len(), 2);
    assert!(ledger.seen_by("u2").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn emails_resolve_case_insensitively() {
    let users = MemoryUserDirectory::default();
    let u = users.register(" Ana@Example.com ", Some("Ana".into())).await.unwrap();
    let found = users.find_by_email("ana@example.COM").await.unwrap().unwrap();
    assert_eq!(found.id, u.id);
    assert!(matches!(
      users.register("ana@example.com", None).await,
      Err(StoreError::Duplicate(_))
    ));
    assert!(matches!(users.register("nope", None).await, Err(StoreError::Invalid(_))));
  }
}
