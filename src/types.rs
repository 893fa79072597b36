//! Core data types for facetus.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Type alias for subject (user) identifiers.
///
/// The host platform keys users by 64-bit integers, and the same type is used
/// for peers and groups so they can be compared directly.
pub type SubjectId = i64;

/// Facet holding the lowercased category (project) titles of a subject.
pub const CATEGORY_TITLES: &str = "categoryTitles";

/// Facet holding the IDs of every peer with a bidirectional connection.
pub const RELATIONSHIP_IDS: &str = "relationshipIds";

/// Query field for group membership. Populated by the host, only queried here.
pub const GROUP_IDS: &str = "groupIds";

/// Identifies a kind of relationship in the host's relationship store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipKind(pub i32);

impl RelationshipKind {
  /// Mutual connection: both subjects acknowledged the relationship.
  pub const BI_CONNECTION: RelationshipKind = RelationshipKind(12);

  /// One-directional follow.
  pub const UNI_FOLLOWER: RelationshipKind = RelationshipKind(8);

  /// Returns the raw value used by the host store.
  pub fn value(self) -> i32 {
    self.0
  }
}

impl Default for RelationshipKind {
  fn default() -> Self {
    Self::BI_CONNECTION
  }
}

impl fmt::Display for RelationshipKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// An unordered pair of subjects joined by a relationship kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
  pub subject: SubjectId,
  pub peer: SubjectId,
  pub kind: RelationshipKind,
}

impl RelationshipEdge {
  /// Creates an edge of the given kind.
  pub fn new(subject: SubjectId, peer: SubjectId, kind: RelationshipKind) -> Self {
    Self { subject, peer, kind }
  }

  /// Returns the other end of the edge, if `id` is one of its ends.
  pub fn other(&self, id: SubjectId) -> Option<SubjectId> {
    if self.subject == id {
      Some(self.peer)
    } else if self.peer == id {
      Some(self.subject)
    } else {
      None
    }
  }
}

/// One category membership returned by a [`TitleLookup`](crate::store::TitleLookup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
  /// The category title as stored by the host, in its original case.
  pub title: String,
}

impl CategoryEntry {
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into() }
  }
}

/// One row of a relationship page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
  /// The related subject.
  pub peer_id: SubjectId,
  /// The value the page was ordered by (the peer's display name).
  pub sort_value: String,
}

impl PeerRecord {
  pub fn new(peer_id: SubjectId, sort_value: impl Into<String>) -> Self {
    Self {
      peer_id,
      sort_value: sort_value.into(),
    }
  }
}

/// The ordering requested from a relationship store page.
///
/// Pages must be requested with a stable key, otherwise concurrent writes
/// can shift entities across page boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
  /// Display name, ascending.
  #[default]
  DisplayNameAsc,
  /// Display name, descending.
  DisplayNameDesc,
}

/// The value stored under a single facet name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
  /// A single keyword.
  Keyword(String),
  /// Several keywords, order and multiplicity preserved.
  Keywords(Vec<String>),
  /// Several subject IDs.
  Ids(Vec<SubjectId>),
}

impl FacetValue {
  /// Returns `true` if the facet carries no values.
  pub fn is_empty(&self) -> bool {
    match self {
      FacetValue::Keyword(s) => s.is_empty(),
      FacetValue::Keywords(v) => v.is_empty(),
      FacetValue::Ids(v) => v.is_empty(),
    }
  }

  /// Number of values carried by the facet.
  pub fn len(&self) -> usize {
    match self {
      FacetValue::Keyword(_) => 1,
      FacetValue::Keywords(v) => v.len(),
      FacetValue::Ids(v) => v.len(),
    }
  }

  /// Returns the keyword values, if this is a keyword facet.
  pub fn as_keywords(&self) -> Option<Vec<&str>> {
    match self {
      FacetValue::Keyword(s) => Some(vec![s.as_str()]),
      FacetValue::Keywords(v) => Some(v.iter().map(String::as_str).collect()),
      FacetValue::Ids(_) => None,
    }
  }

  /// Returns the ID values, if this is an ID facet.
  pub fn as_ids(&self) -> Option<&[SubjectId]> {
    match self {
      FacetValue::Ids(v) => Some(v),
      _ => None,
    }
  }
}

/// The flat field map merged into an outgoing search document.
///
/// Entries keep their insertion order. Inserting an existing name replaces
/// the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedFields {
  entries: Vec<(String, FacetValue)>,
}

impl EnrichedFields {
  /// Creates an empty field map.
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a facet, returning the previous value under that name.
  pub fn insert(&mut self, name: impl Into<String>, value: FacetValue) -> Option<FacetValue> {
    let name = name.into();
    match self.entries.iter_mut().find(|(n, _)| *n == name) {
      Some((_, existing)) => Some(std::mem::replace(existing, value)),
      None => {
        self.entries.push((name, value));
        None
      }
    }
  }

  /// Looks up a facet by name.
  pub fn get(&self, name: &str) -> Option<&FacetValue> {
    self
      .entries
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  /// The `categoryTitles` facet as string slices. Empty when absent.
  pub fn category_titles(&self) -> Vec<&str> {
    self
      .get(CATEGORY_TITLES)
      .and_then(FacetValue::as_keywords)
      .unwrap_or_default()
  }

  /// The `relationshipIds` facet. Empty when absent.
  pub fn relationship_ids(&self) -> &[SubjectId] {
    self
      .get(RELATIONSHIP_IDS)
      .and_then(FacetValue::as_ids)
      .unwrap_or(&[])
  }

  /// Iterates over facets in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &FacetValue)> {
    self.entries.iter().map(|(n, v)| (n.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Serialize for EnrichedFields {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (name, value) in &self.entries {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}
