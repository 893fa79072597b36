//! Term constraints and the boolean query they are collected into.
//!
//! The host search engine owns the real query objects. This module models the
//! subset the enricher emits, and can evaluate a query against an
//! [`EnrichedFields`] map so index-time facets can be checked against the
//! constraints built for them at search time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EnrichedFields, FacetValue, SubjectId};

/// How a clause participates in the enclosing boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occur {
  /// The document must satisfy the clause.
  Required,
  /// The clause contributes to matching but is not mandatory.
  Should,
}

/// The value a term constraint compares against.
///
/// The `#[serde(untagged)]` attribute lets hosts pass plain JSON strings and
/// numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
  /// A subject, group or relationship ID.
  Id(SubjectId),
  /// A text value.
  Text(String),
}

impl fmt::Display for TermValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TermValue::Id(id) => write!(f, "{id}"),
      TermValue::Text(s) => f.write_str(s),
    }
  }
}

impl From<SubjectId> for TermValue {
  fn from(id: SubjectId) -> Self {
    TermValue::Id(id)
  }
}

impl From<&str> for TermValue {
  fn from(s: &str) -> Self {
    TermValue::Text(s.to_string())
  }
}

impl From<String> for TermValue {
  fn from(s: String) -> Self {
    TermValue::Text(s)
  }
}

/// A single term clause on one document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConstraint {
  /// The document field the term applies to.
  pub field: String,
  /// The value to match.
  pub value: TermValue,
  /// Required or optional.
  pub occur: Occur,
  /// When set, the value matches as a substring instead of a whole term.
  #[serde(default)]
  pub like: bool,
}

impl QueryConstraint {
  /// A required whole-term clause.
  pub fn required(field: impl Into<String>, value: impl Into<TermValue>) -> Self {
    Self {
      field: field.into(),
      value: value.into(),
      occur: Occur::Required,
      like: false,
    }
  }

  /// An optional whole-term clause.
  pub fn should(field: impl Into<String>, value: impl Into<TermValue>) -> Self {
    Self {
      field: field.into(),
      value: value.into(),
      occur: Occur::Should,
      like: false,
    }
  }

  /// Switches the clause to substring matching.
  pub fn like(mut self) -> Self {
    self.like = true;
    self
  }

  pub fn is_required(&self) -> bool {
    self.occur == Occur::Required
  }

  /// Tests the clause against a document's fields.
  ///
  /// Text matching ignores ASCII case, the way the host's keyword analyzer
  /// folds terms. A missing field never matches.
  pub fn matches(&self, fields: &EnrichedFields) -> bool {
    let Some(facet) = fields.get(&self.field) else {
      return false;
    };

    match (&self.value, facet) {
      (TermValue::Id(id), FacetValue::Ids(ids)) => ids.contains(id),
      (value, FacetValue::Ids(ids)) => {
        let needle = value.to_string();
        ids.iter().any(|id| self.text_matches(&id.to_string(), &needle))
      }
      (value, _) => {
        let needle = value.to_string();
        facet
          .as_keywords()
          .unwrap_or_default()
          .iter()
          .any(|kw| self.text_matches(kw, &needle))
      }
    }
  }

  fn text_matches(&self, haystack: &str, needle: &str) -> bool {
    if self.like {
      haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
    } else {
      haystack.eq_ignore_ascii_case(needle)
    }
  }
}

/// A flat boolean query: a list of term clauses.
///
/// All required clauses must match. When there are no required clauses, at
/// least one optional clause must match. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanQuery {
  clauses: Vec<QueryConstraint>,
}

impl BooleanQuery {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends an already built clause.
  pub fn add(&mut self, constraint: QueryConstraint) {
    self.clauses.push(constraint);
  }

  /// Appends a required clause.
  pub fn add_required_term(&mut self, field: impl Into<String>, value: impl Into<TermValue>, like: bool) {
    let mut constraint = QueryConstraint::required(field, value);
    constraint.like = like;
    self.add(constraint);
  }

  /// Appends an optional clause.
  pub fn add_term(&mut self, field: impl Into<String>, value: impl Into<TermValue>, like: bool) {
    let mut constraint = QueryConstraint::should(field, value);
    constraint.like = like;
    self.add(constraint);
  }

  pub fn clauses(&self) -> &[QueryConstraint] {
    &self.clauses
  }

  pub fn is_empty(&self) -> bool {
    self.clauses.is_empty()
  }

  pub fn len(&self) -> usize {
    self.clauses.len()
  }

  /// Evaluates the query against a document's fields.
  pub fn matches(&self, fields: &EnrichedFields) -> bool {
    let (required, optional): (Vec<_>, Vec<_>) =
      self.clauses.iter().partition(|c| c.is_required());

    if !required.iter().all(|c| c.matches(fields)) {
      return false;
    }

    !required.is_empty() || optional.is_empty() || optional.iter().any(|c| c.matches(fields))
  }
}

impl Extend<QueryConstraint> for BooleanQuery {
  fn extend<I: IntoIterator<Item = QueryConstraint>>(&mut self, iter: I) {
    self.clauses.extend(iter);
  }
}

impl FromIterator<QueryConstraint> for BooleanQuery {
  fn from_iter<I: IntoIterator<Item = QueryConstraint>>(iter: I) -> Self {
    Self {
      clauses: iter.into_iter().collect(),
    }
  }
}
