//! Writing rendered documents to the output root

use super::documents::RenderedDocument;
use super::summary::WrittenDocument;
use crate::domain::context::ResultExt;
use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// A document written to a temporary sibling, waiting to be renamed
#[derive(Debug)]
struct StagedDocument {
    temp_path: PathBuf,
    final_path: PathBuf,
    written: WrittenDocument,
}

/// Writes export documents below one directory
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    output_root: PathBuf,
}

fn describe(document: &RenderedDocument, path: &Path) -> WrittenDocument {
    WrittenDocument {
        name: document.name.to_string(),
        path: path.to_path_buf(),
        records: document.records,
        bytes: document.bytes.len() as u64,
        sha256: format!("{:x}", Sha256::digest(&document.bytes)),
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.sync_all()
        .await
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

impl DocumentWriter {
    /// Create a writer for `output_root`
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Final path of a document
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_root.join(name)
    }

    /// Overwrite a document in place
    ///
    /// A failure part way through can leave a truncated file behind.
    pub async fn write_direct(&self, document: &RenderedDocument) -> Result<WrittenDocument> {
        let path = self.path_for(document.name);
        write_file(&path, &document.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = document.bytes.len(), "Document written");
        Ok(describe(document, &path))
    }

    /// Replace a set of documents
    ///
    /// Every document is first written to a temporary file in the output
    /// root. Only when all of them are on disk are they renamed over their
    /// targets, so a failed write leaves the previous files untouched.
    pub async fn write_all_atomic(
        &self,
        documents: &[RenderedDocument],
    ) -> Result<Vec<WrittenDocument>> {
        let mut staged = Vec::with_capacity(documents.len());
        for document in documents {
            match self.stage(document).await {
                Ok(entry) => staged.push(entry),
                Err(e) => {
                    discard(&staged).await;
                    return Err(e);
                }
            }
        }

        let mut written = Vec::with_capacity(staged.len());
        for (index, entry) in staged.iter().enumerate() {
            if let Err(e) = tokio::fs::rename(&entry.temp_path, &entry.final_path)
                .await
                .with_context(|| format!("Failed to replace {}", entry.final_path.display()))
            {
                discard(&staged[index..]).await;
                return Err(e);
            }
            tracing::debug!(path = %entry.final_path.display(), "Document replaced");
            written.push(entry.written.clone());
        }

        Ok(written)
    }

    async fn stage(&self, document: &RenderedDocument) -> Result<StagedDocument> {
        let final_path = self.path_for(document.name);
        let temp_path = self
            .output_root
            .join(format!(".{}.{}.tmp", document.name, uuid::Uuid::new_v4().simple()));

        if let Err(e) = write_file(&temp_path, &document.bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        Ok(StagedDocument {
            written: describe(document, &final_path),
            temp_path,
            final_path,
        })
    }
}

async fn discard(staged: &[StagedDocument]) {
    for entry in staged {
        if let Err(e) = tokio::fs::remove_file(&entry.temp_path).await {
            tracing::warn!(
                path = %entry.temp_path.display(),
                error = %e,
                "Failed to remove temporary file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(name: &'static str, text: &str) -> RenderedDocument {
        RenderedDocument {
            name,
            records: 1,
            bytes: text.as_bytes().to_vec(),
        }
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[tokio::test]
    async fn test_write_direct_overwrites() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("assets.json"), "old content that is longer").unwrap();

        let writer = DocumentWriter::new(dir.path());
        let written = writer.write_direct(&doc("assets.json", "[]")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&written.path).unwrap(), "[]");
        assert_eq!(written.bytes, 2);
    }

    #[tokio::test]
    async fn test_write_all_atomic_replaces_every_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("assets.json"), "old").unwrap();

        let writer = DocumentWriter::new(dir.path());
        let written = writer
            .write_all_atomic(&[doc("assets.json", "[1]"), doc("metadata.json", "{}")])
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("assets.json")).unwrap(),
            "[1]"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("metadata.json")).unwrap(),
            "{}"
        );
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_checksum_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let writer = DocumentWriter::new(dir.path());
        let written = writer.write_direct(&doc("assets.json", "abc")).await.unwrap();

        assert_eq!(
            written.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_missing_output_root_fails_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let writer = DocumentWriter::new(dir.path().join("missing"));

        let result = writer.write_all_atomic(&[doc("assets.json", "[]")]).await;

        assert!(result.is_err());
        assert!(!dir.path().join("missing").exists());
    }
}
