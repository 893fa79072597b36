use facetus::prelude::*;
use serde_json::json;
use std::sync::Arc;

struct ScreenNameHook;

impl IndexerHook for ScreenNameHook {
  fn post_process_document(&self, subject: SubjectId, fields: &mut EnrichedFields) -> Result<()> {
    fields.insert("screenName", FacetValue::Keyword(format!("user{subject}")));
    Ok(())
  }

  fn post_process_context_query(&self, _params: &QueryParams, query: &mut BooleanQuery) {
    query.add_required_term("status", "active", false);
  }
}

struct ScreenNameSearchHook;

impl IndexerHook for ScreenNameSearchHook {
  fn post_process_search_query(&self, keywords: &str, query: &mut BooleanQuery) {
    query.add_term("screenName", keywords, true);
  }
}

fn social_store() -> Arc<InMemStore> {
  let mut store = InMemStore::new();
  store.add_subject(1, "Ada");
  store.add_subject(2, "Grace");
  store.add_subject(3, "Linus");
  store.add_category("Apollo Guidance", &[1, 2]);
  store.add_category("Kernel", &[3]);
  store.connect(1, 2, RelationshipKind::BI_CONNECTION);
  store.connect(2, 3, RelationshipKind::BI_CONNECTION);
  store.connect(1, 3, RelationshipKind::UNI_FOLLOWER);
  Arc::new(store)
}

fn pipeline() -> IndexingPipeline {
  let store = social_store();
  let enricher = DocumentEnricher::builder()
    .titles(store.clone())
    .relationships(store)
    .page_size(1)
    .build()
    .unwrap();

  IndexingPipeline::builder()
    .with(Box::new(ScreenNameHook))
    .with(Box::new(enricher))
    .with(Box::new(ScreenNameSearchHook))
    .build()
}

#[test]
fn test_document_hooks() {
  let pipeline = pipeline();
  let document = pipeline.build_document(2).unwrap();

  let names: Vec<&str> = document.iter().map(|(n, _)| n).collect();
  assert_eq!(names, vec!["screenName", CATEGORY_TITLES, RELATIONSHIP_IDS]);
  assert_eq!(document.category_titles(), vec!["apollo guidance"]);
  assert_eq!(document.relationship_ids(), &[1, 3]);

  let json = serde_json::to_value(&document).unwrap();
  assert_eq!(
    json,
    json!({
      "screenName": "user2",
      "categoryTitles": ["apollo guidance"],
      "relationshipIds": [1, 3]
    })
  );
}

#[test]
fn test_context_query_from_host_params() {
  let pipeline = pipeline();
  let params = QueryParams::from_value(json!({
    "categoryTitles": "apollo",
    "relationshipKind": [2, 12],
    "groupIDs": 10
  }))
  .unwrap();

  let query = pipeline.context_query(&params);
  let fields: Vec<&str> = query.clauses().iter().map(|c| c.field.as_str()).collect();
  assert_eq!(fields, vec!["status", CATEGORY_TITLES, RELATIONSHIP_IDS, GROUP_IDS]);

  // Ada and Linus are both connected to Grace, but only Ada is in Apollo.
  let relationship_only: BooleanQuery = pipeline
    .context_query(&params)
    .clauses()
    .iter()
    .filter(|c| c.field == CATEGORY_TITLES || c.field == RELATIONSHIP_IDS)
    .cloned()
    .collect();
  let ada = pipeline.build_document(1).unwrap();
  let linus = pipeline.build_document(3).unwrap();
  assert!(relationship_only.matches(&ada));
  assert!(!relationship_only.matches(&linus));
}

#[test]
fn test_search_query_combines_hooks() {
  let pipeline = pipeline();
  let query = pipeline.search_query("Kernel");
  assert_eq!(query.len(), 2);

  let linus = pipeline.build_document(3).unwrap();
  let ada = pipeline.build_document(1).unwrap();
  assert!(query.matches(&linus));
  assert!(!query.matches(&ada));

  assert!(pipeline.search_query("   ").clauses().iter().all(|c| c.field != CATEGORY_TITLES));
}

#[test]
fn test_batch_isolates_failures() {
  struct Flaky;

  impl TitleLookup for Flaky {
    fn category_titles(&self, subject: SubjectId) -> Result<Vec<CategoryEntry>, BoxError> {
      if subject == 2 {
        Err("lookup timed out".into())
      } else {
        Ok(vec![CategoryEntry::new("Ops")])
      }
    }
  }

  let enricher = DocumentEnricher::builder()
    .titles(Arc::new(Flaky))
    .relationships(social_store())
    .build()
    .unwrap();
  let pipeline = IndexingPipeline::builder().with(Box::new(enricher)).build();

  let results = pipeline.build_documents(&[1, 2, 3]);
  assert!(results[0].1.is_ok());
  assert!(results[1].1.as_ref().unwrap_err().is_upstream());
  assert!(results[2].1.is_ok());
}
