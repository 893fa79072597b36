//! In-memory collaborator implementation.

use crate::error::BoxError;
use crate::store::adapter::{RelationshipStore, TitleLookup};
use crate::types::{
    CategoryEntry, PeerRecord, RelationshipEdge, RelationshipKind, SortKey, SubjectId,
};
use std::collections::{HashMap, HashSet};

/// In-memory subjects, categories and relationships using HashMaps.
///
/// Implements both [`TitleLookup`] and [`RelationshipStore`], which makes it a
/// convenient stand-in for the host platform in tests and demos.
#[derive(Debug, Default)]
pub struct InMemStore {
    names: HashMap<SubjectId, String>,
    categories: HashMap<SubjectId, Vec<CategoryEntry>>,
    edges: HashSet<RelationshipEdge>,
}

impl InMemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subject and its display name.
    pub fn add_subject(&mut self, id: SubjectId, display_name: impl Into<String>) {
        self.names.insert(id, display_name.into());
    }

    /// Add `members` to a category with the given title.
    ///
    /// Memberships are returned in insertion order.
    pub fn add_category(&mut self, title: impl Into<String>, members: &[SubjectId]) {
        let entry = CategoryEntry::new(title);
        for member in members {
            self.categories
                .entry(*member)
                .or_default()
                .push(entry.clone());
        }
    }

    /// Relate two subjects. The edge is visible from both ends.
    pub fn connect(&mut self, a: SubjectId, b: SubjectId, kind: RelationshipKind) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.edges.insert(RelationshipEdge::new(low, high, kind));
    }

    /// Display name used as the page sort value.
    pub fn display_name(&self, id: SubjectId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn peers(&self, subject: SubjectId, kind: RelationshipKind) -> Vec<SubjectId> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == kind)
            .filter_map(|edge| edge.other(subject))
            .collect()
    }
}

impl TitleLookup for InMemStore {
    fn category_titles(&self, subject: SubjectId) -> Result<Vec<CategoryEntry>, BoxError> {
        Ok(self.categories.get(&subject).cloned().unwrap_or_default())
    }
}

impl RelationshipStore for InMemStore {
    fn count(&self, subject: SubjectId, kind: RelationshipKind) -> Result<usize, BoxError> {
        Ok(self.peers(subject, kind).len())
    }

    fn page(
        &self,
        subject: SubjectId,
        kind: RelationshipKind,
        offset: usize,
        limit: usize,
        sort: SortKey,
    ) -> Result<Vec<PeerRecord>, BoxError> {
        let mut records: Vec<PeerRecord> = self
            .peers(subject, kind)
            .into_iter()
            .map(|peer| PeerRecord::new(peer, self.display_name(peer)))
            .collect();

        // Ties on display name fall back to the ID so pages never overlap.
        records.sort_by(|a, b| {
            a.sort_value
                .cmp(&b.sort_value)
                .then(a.peer_id.cmp(&b.peer_id))
        });
        if sort == SortKey::DisplayNameDesc {
            records.reverse();
        }

        Ok(records.into_iter().skip(offset).take(limit).collect())
    }
}
