//! Integration tests for XML record import

use async_trait::async_trait;
use spo_exporter::adapters::database::{InsertBatchResult, StatementSink};
use spo_exporter::config::parse_config;
use spo_exporter::core::import::RecordImporter;
use spo_exporter::core::transform::{BindValue, InsertStatement};
use spo_exporter::domain::{ExporterError, Result};
use std::sync::Mutex;

const MAPPINGS: &str = r#"
[[import.tables]]
table = "litmos.Course_Modules"
record_element = "Module"
columns = [
    { type = "ancestor", depth = 2, inner = { type = "value", field = "Id" } },
    { type = "value", field = "Id" },
    { type = "string", field = "Name" },
    { type = "value", field = "Score", default = "0" },
    { type = "bit", field = "Active" },
    { type = "constant", value = "'Litmos'" },
]
"#;

const COURSES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Courses>
  <Course>
    <Id>40</Id>
    <Name>Intro to SQL</Name>
    <Modules>
      <Module><Id>401</Id><Name>Joins &amp; Keys</Name><Score>85</Score><Active>Yes</Active></Module>
      <Module><Id>402</Id><Name>Bob's Indexes</Name><Active>f</Active></Module>
    </Modules>
  </Course>
  <Course>
    <Id>41</Id>
    <Modules>
      <Module><Id>411</Id><Active>TRUE</Active></Module>
    </Modules>
  </Course>
</Courses>"#;

#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<Vec<InsertStatement>>>,
}

#[async_trait]
impl StatementSink for RecordingSink {
    async fn insert_all(&self, statements: &[InsertStatement]) -> Result<InsertBatchResult> {
        self.batches.lock().unwrap().push(statements.to_vec());
        Ok(InsertBatchResult {
            statements: statements.len(),
            rows_affected: statements.len() as u64,
        })
    }
}

struct RejectingSink;

#[async_trait]
impl StatementSink for RejectingSink {
    async fn insert_all(&self, _statements: &[InsertStatement]) -> Result<InsertBatchResult> {
        Err(ExporterError::Database(
            "duplicate key value violates unique constraint".to_string(),
        ))
    }
}

fn importer() -> RecordImporter {
    let config = parse_config(MAPPINGS).unwrap();
    RecordImporter::new(config.import.table("litmos.Course_Modules").unwrap())
}

#[test]
fn test_render_uses_ancestor_context() {
    let rendered = importer().render(COURSES).unwrap();

    assert_eq!(
        rendered,
        vec![
            r#"insert into "litmos"."Course_Modules" values (40,401,'Joins & Keys',85,1,'Litmos')"#,
            r#"insert into "litmos"."Course_Modules" values (40,402,'Bob''s Indexes',0,0,'Litmos')"#,
            r#"insert into "litmos"."Course_Modules" values (41,411,,0,1,'Litmos')"#,
        ]
    );
}

#[test]
fn test_statements_bind_typed_values() {
    let statements = importer().build_statements(COURSES).unwrap();

    assert_eq!(
        statements[1].sql(),
        r#"insert into "litmos"."Course_Modules" values ($1, $2, $3, $4, $5, $6)"#
    );

    let binds: Vec<BindValue> = statements[1].values().iter().map(|v| v.to_bind()).collect();
    assert_eq!(
        binds,
        vec![
            BindValue::Text("40".to_string()),
            BindValue::Text("402".to_string()),
            BindValue::Text("Bob's Indexes".to_string()),
            BindValue::Text("0".to_string()),
            BindValue::Bit(false),
            BindValue::Text("Litmos".to_string()),
        ]
    );

    let missing_name = statements[2].values()[2].to_bind();
    assert_eq!(missing_name, BindValue::Null);
}

#[tokio::test]
async fn test_import_sends_one_batch() {
    let sink = RecordingSink::default();

    let report = importer().import(COURSES, &sink).await.unwrap();

    assert_eq!(report.table, "litmos.Course_Modules");
    assert_eq!(report.records, 3);
    assert_eq!(report.rows_affected, 3);
    assert!(!report.dry_run);

    let batches = sink.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
}

#[tokio::test]
async fn test_invalid_record_sends_nothing() {
    let sink = RecordingSink::default();
    let xml = "<Courses><Course><Id>1</Id><Modules><Module><Id>2</Id></Module></Modules>\
               </Course></Courses>";

    let err = importer().import(xml, &sink).await.unwrap_err();

    assert!(err.to_string().starts_with("Module record 1 is invalid"));
    assert!(sink.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sink_failure_propagates() {
    let err = importer().import(COURSES, &RejectingSink).await.unwrap_err();
    assert!(matches!(err, ExporterError::Database(_)));
}

#[tokio::test]
async fn test_document_without_records_imports_nothing() {
    let sink = RecordingSink::default();

    let report = importer().import("<Courses/>", &sink).await.unwrap();

    assert_eq!(report.records, 0);
    assert_eq!(sink.batches.lock().unwrap()[0].len(), 0);
}
