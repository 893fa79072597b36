//! Indexes sample users with relationship and project facets, then runs a
//! few searches against the enriched documents.

mod common;

use common::{sample_store, sample_users};
use facetus::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
  println!("=== Facetus Social Index ===\n");

  let config = EnricherConfig::from_toml_str("page_size = 2")?;
  let store = Arc::new(sample_store());
  let enricher = DocumentEnricher::builder()
    .titles(store.clone())
    .relationships(store)
    .config(config)
    .build()?;

  let pipeline = IndexingPipeline::builder().with(Box::new(enricher)).build();

  let users = sample_users();
  let ids: Vec<SubjectId> = users.iter().map(|u| u.id).collect();
  let mut documents = Vec::new();
  for (id, result) in pipeline.build_documents(&ids) {
    let fields = result?;
    println!("{id}: {}", serde_json::to_string(&fields).unwrap_or_default());
    documents.push((id, fields));
  }

  let name_of = |id: SubjectId| {
    users
      .iter()
      .find(|u| u.id == id)
      .map(|u| u.name.as_str())
      .unwrap_or("?")
  };

  println!("\n--- Keyword search: 'rust' ---");
  let query = pipeline.search_query("rust");
  for (id, fields) in &documents {
    if query.matches(fields) {
      println!("Found: {}", name_of(*id));
    }
  }

  println!("\n--- Connections of Alice in 'Machine Learning' ---");
  let params = QueryParams::from_json(r#"{"categoryTitles": "machine learning", "relationshipKind": [1, 12]}"#)?;
  let query = pipeline.context_query(&params);
  for (id, fields) in &documents {
    if query.matches(fields) {
      println!("Found: {}", name_of(*id));
    }
  }

  Ok(())
}
