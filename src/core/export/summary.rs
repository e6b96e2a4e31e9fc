//! Export summary and reporting

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// A document that reached its final location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenDocument {
    /// File name, e.g. `assets.json`
    pub name: String,

    /// Full path of the written file
    pub path: PathBuf,

    /// Number of records in the document
    pub records: usize,

    /// Size of the written file in bytes
    pub bytes: u64,

    /// Hex-encoded SHA-256 of the written bytes
    pub sha256: String,
}

/// Summary of one export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Unique identifier of the run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Duration of the run
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Documents written, in write order
    pub documents: Vec<WrittenDocument>,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl ExportSummary {
    /// Start a new summary stamped with a fresh run id
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            documents: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a written document
    pub fn add_document(&mut self, document: WrittenDocument) {
        self.documents.push(document);
    }

    /// Look up a written document by file name
    pub fn document(&self, name: &str) -> Option<&WrittenDocument> {
        self.documents.iter().find(|d| d.name == name)
    }

    /// Total records across all documents
    pub fn total_records(&self) -> usize {
        self.documents.iter().map(|d| d.records).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            documents = self.documents.len(),
            records = self.total_records(),
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        for document in &self.documents {
            tracing::info!(
                run_id = %self.run_id,
                name = %document.name,
                path = %document.path.display(),
                records = document.records,
                bytes = document.bytes,
                sha256 = %document.sha256,
                "Document written"
            );
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str, records: usize) -> WrittenDocument {
        WrittenDocument {
            name: name.to_string(),
            path: PathBuf::from("/tmp").join(name),
            records,
            bytes: 10,
            sha256: "00".repeat(32),
        }
    }

    #[test]
    fn test_new_summary_is_empty() {
        let summary = ExportSummary::new();
        assert!(summary.documents.is_empty());
        assert_eq!(summary.total_records(), 0);
    }

    #[test]
    fn test_runs_get_distinct_ids() {
        assert_ne!(ExportSummary::new().run_id, ExportSummary::new().run_id);
    }

    #[test]
    fn test_document_lookup_and_totals() {
        let mut summary = ExportSummary::new();
        summary.add_document(document("assets.json", 3));
        summary.add_document(document("metadata.json", 7));

        assert_eq!(summary.total_records(), 10);
        assert_eq!(summary.document("metadata.json").unwrap().records, 7);
        assert!(summary.document("missing.json").is_none());
    }

    #[test]
    fn test_serializes_duration_in_millis() {
        let summary = ExportSummary::new().with_duration(Duration::from_millis(1500));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["duration_ms"], 1500);
        assert!(value["run_id"].is_string());
    }
}
