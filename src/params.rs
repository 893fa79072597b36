//! The search-context parameter bag the enricher turns into query filters.
//!
//! Hosts hand parameters over as a loosely typed JSON object. The shape of each
//! value is resolved once here, so the enricher only ever sees typed fields.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FacetusError, Result};
use crate::types::SubjectId;

/// Group membership filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Option<GroupIdsRepr>", into = "Option<GroupIdsRepr>")]
pub enum GroupIds {
  /// No group filter.
  #[default]
  None,
  /// Exactly one group.
  Single(SubjectId),
  /// Several groups; each one becomes its own required term.
  Multiple(Vec<SubjectId>),
}

/// Wire shape of [`GroupIds`]: a bare ID, a numeric string or a list of IDs.
#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupIdsRepr {
  Many(Vec<SubjectId>),
  One(SubjectId),
  Text(String),
}

impl TryFrom<Option<GroupIdsRepr>> for GroupIds {
  type Error = String;

  fn try_from(repr: Option<GroupIdsRepr>) -> std::result::Result<Self, Self::Error> {
    Ok(match repr {
      None => GroupIds::None,
      Some(GroupIdsRepr::One(id)) => GroupIds::Single(id),
      Some(GroupIdsRepr::Many(ids)) => GroupIds::Multiple(ids),
      Some(GroupIdsRepr::Text(text)) if !is_present_text(&text) => GroupIds::None,
      Some(GroupIdsRepr::Text(text)) => text
        .trim()
        .parse()
        .map(GroupIds::Single)
        .map_err(|_| format!("group id `{text}` is not a number"))?,
    })
  }
}

impl From<GroupIds> for Option<GroupIdsRepr> {
  fn from(ids: GroupIds) -> Self {
    match ids {
      GroupIds::None => None,
      GroupIds::Single(id) => Some(GroupIdsRepr::One(id)),
      GroupIds::Multiple(ids) => Some(GroupIdsRepr::Many(ids)),
    }
  }
}

impl GroupIds {
  /// The IDs that should become query terms, in input order.
  ///
  /// A single zero ID counts as unset. Multi-value lists are passed through
  /// unchanged.
  pub fn terms(&self) -> &[SubjectId] {
    match self {
      GroupIds::None => &[],
      GroupIds::Single(id) if !is_present_id(*id) => &[],
      GroupIds::Single(id) => std::slice::from_ref(id),
      GroupIds::Multiple(ids) => ids,
    }
  }

  pub fn is_present(&self) -> bool {
    !self.terms().is_empty()
  }
}

/// Optional search-context parameters recognized by the enricher.
///
/// ```
/// use facetus::params::{GroupIds, QueryParams};
///
/// let params = QueryParams::from_json(r#"{"categoryTitles": "Alpha", "groupIDs": [1, 2]}"#).unwrap();
/// assert_eq!(params.category_titles.as_deref(), Some("Alpha"));
/// assert_eq!(params.group_ids, GroupIds::Multiple(vec![1, 2]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
  /// Restrict to subjects belonging to a category with this title.
  ///
  /// Numbers and booleans are taken in their JSON text form.
  #[serde(rename = "categoryTitles", alias = "projectTitles", default, deserialize_with = "scalar_text")]
  pub category_titles: Option<String>,

  /// Restrict to subjects related to this ID.
  ///
  /// Hosts may send the `[id, kind]` pair they use internally; only the first
  /// element is kept, zero included. A bare zero counts as unset.
  #[serde(
    rename = "relationshipKind",
    default,
    deserialize_with = "first_of_scalar_or_list"
  )]
  pub relationship: Option<SubjectId>,

  /// Restrict to members of these groups.
  #[serde(rename = "groupIDs", alias = "groupIds", default)]
  pub group_ids: GroupIds,
}

impl QueryParams {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses a JSON parameter bag.
  pub fn from_json(json: &str) -> Result<Self> {
    serde_json::from_str(json).map_err(|e| FacetusError::invalid_params(e.to_string()))
  }

  /// Resolves an already parsed JSON value.
  pub fn from_value(value: Value) -> Result<Self> {
    if value.is_null() {
      return Ok(Self::default());
    }
    serde_json::from_value(value).map_err(|e| FacetusError::invalid_params(e.to_string()))
  }

  pub fn category_titles(mut self, title: impl Into<String>) -> Self {
    self.category_titles = Some(title.into());
    self
  }

  /// Sets the relationship filter. Zero clears it.
  pub fn relationship(mut self, id: SubjectId) -> Self {
    self.relationship = Some(id).filter(|id| is_present_id(*id));
    self
  }

  pub fn group_ids(mut self, group_ids: GroupIds) -> Self {
    self.group_ids = group_ids;
    self
  }
}

fn first_of_scalar_or_list<'de, D>(deserializer: D) -> std::result::Result<Option<SubjectId>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Repr {
    List(Vec<SubjectId>),
    One(SubjectId),
  }

  Ok(match Option::<Repr>::deserialize(deserializer)? {
    None => None,
    Some(Repr::One(id)) => Some(id).filter(|id| is_present_id(*id)),
    Some(Repr::List(ids)) => ids.first().copied(),
  })
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  use serde::de::Error;

  Ok(match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => None,
    Some(Value::String(text)) => Some(text),
    Some(value @ (Value::Number(_) | Value::Bool(_))) => Some(value.to_string()),
    Some(other) => {
      return Err(D::Error::custom(format!("expected a string or number, got {other}")));
    }
  })
}

/// Null-aware check for text values.
///
/// Empty, whitespace-only and the literal `"null"` all count as absent.
pub fn is_present_text(value: &str) -> bool {
  let trimmed = value.trim();
  !trimmed.is_empty() && trimmed != "null"
}

/// Null-aware check for scalar IDs: zero counts as absent.
pub fn is_present_id(value: SubjectId) -> bool {
  value != 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scalar_group_resolves_to_single() {
    let params = QueryParams::from_json(r#"{"groupIDs": 7}"#).unwrap();
    assert_eq!(params.group_ids, GroupIds::Single(7));
  }

  #[test]
  fn list_group_resolves_to_multiple() {
    let params = QueryParams::from_json(r#"{"groupIds": [1, 2]}"#).unwrap();
    assert_eq!(params.group_ids, GroupIds::Multiple(vec![1, 2]));
  }

  #[test]
  fn null_and_missing_fields_are_absent() {
    let params = QueryParams::from_json(r#"{"groupIDs": null, "categoryTitles": null}"#).unwrap();
    assert_eq!(params, QueryParams::default());
    assert_eq!(QueryParams::from_value(Value::Null).unwrap(), QueryParams::default());
  }

  #[test]
  fn relationship_pair_keeps_first_element() {
    let params = QueryParams::from_json(r#"{"relationshipKind": [5, 12]}"#).unwrap();
    assert_eq!(params.relationship, Some(5));

    let params = QueryParams::from_json(r#"{"relationshipKind": 3}"#).unwrap();
    assert_eq!(params.relationship, Some(3));

    let params = QueryParams::from_json(r#"{"relationshipKind": []}"#).unwrap();
    assert_eq!(params.relationship, None);
  }

  #[test]
  fn unresolvable_shapes_are_rejected() {
    let err = QueryParams::from_json(r#"{"groupIDs": {"id": 1}}"#).unwrap_err();
    assert!(matches!(err, FacetusError::InvalidParams { .. }));

    let err = QueryParams::from_json(r#"{"groupIDs": "seven"}"#).unwrap_err();
    assert!(matches!(err, FacetusError::InvalidParams { .. }));

    let err = QueryParams::from_json(r#"{"categoryTitles": ["Alpha"]}"#).unwrap_err();
    assert!(matches!(err, FacetusError::InvalidParams { .. }));
  }

  #[test]
  fn numeric_strings_resolve_to_ids() {
    let params = QueryParams::from_json(r#"{"groupIDs": "7"}"#).unwrap();
    assert_eq!(params.group_ids, GroupIds::Single(7));

    let params = QueryParams::from_json(r#"{"groupIDs": " 12 "}"#).unwrap();
    assert_eq!(params.group_ids, GroupIds::Single(12));

    let params = QueryParams::from_json(r#"{"groupIDs": ""}"#).unwrap();
    assert_eq!(params.group_ids, GroupIds::None);
  }

  #[test]
  fn scalar_titles_are_taken_as_text() {
    let params = QueryParams::from_json(r#"{"categoryTitles": 2024}"#).unwrap();
    assert_eq!(params.category_titles.as_deref(), Some("2024"));

    let params = QueryParams::from_json(r#"{"projectTitles": "Apollo"}"#).unwrap();
    assert_eq!(params.category_titles.as_deref(), Some("Apollo"));
  }

  #[test]
  fn zero_relationship_is_unset_only_as_a_scalar() {
    let params = QueryParams::from_json(r#"{"relationshipKind": 0}"#).unwrap();
    assert_eq!(params.relationship, None);

    let params = QueryParams::from_json(r#"{"relationshipKind": [0, 12]}"#).unwrap();
    assert_eq!(params.relationship, Some(0));

    assert_eq!(QueryParams::new().relationship(0).relationship, None);
  }

  #[test]
  fn zero_single_group_is_not_a_term() {
    assert!(GroupIds::Single(0).terms().is_empty());
    assert_eq!(GroupIds::Multiple(vec![0, 4]).terms(), &[0, 4]);
    assert!(!GroupIds::Multiple(vec![]).is_present());
  }

  #[test]
  fn text_presence() {
    assert!(is_present_text("Alpha"));
    assert!(!is_present_text(""));
    assert!(!is_present_text("   "));
    assert!(!is_present_text("null"));
  }
}
