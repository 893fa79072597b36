use facetus::prelude::*;
use serde::{Deserialize, Serialize};

/// A portal user for demonstration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: SubjectId,
  pub name: String,
  pub projects: Vec<String>,
}

impl User {
  /// Create a new user.
  pub fn new(id: SubjectId, name: impl Into<String>, projects: &[&str]) -> Self {
    Self {
      id,
      name: name.into(),
      projects: projects.iter().map(|p| p.to_string()).collect(),
    }
  }
}

/// Create sample users for demos.
pub fn sample_users() -> Vec<User> {
  vec![
    User::new(1, "Alice", &["Search Platform", "Rust Guild"]),
    User::new(2, "Bob", &["Search Platform"]),
    User::new(3, "Charlie", &["Machine Learning"]),
    User::new(4, "Dana", &["Rust Guild", "Machine Learning"]),
    User::new(5, "Eve", &[]),
  ]
}

/// Mutual connections between the sample users.
pub fn sample_connections() -> Vec<(SubjectId, SubjectId)> {
  vec![(1, 2), (1, 4), (2, 3), (3, 4), (4, 5)]
}

/// Load the sample data into an in-memory store.
pub fn sample_store() -> InMemStore {
  let mut store = InMemStore::new();
  for user in sample_users() {
    store.add_subject(user.id, user.name.clone());
    for project in &user.projects {
      store.add_category(project.clone(), &[user.id]);
    }
  }
  for (a, b) in sample_connections() {
    store.connect(a, b, RelationshipKind::BI_CONNECTION);
  }
  store
}
