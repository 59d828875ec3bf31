//! Persistence for the alumni document and its photo files.
//!
//! The JSON document on disk is the source of truth; it is read once at
//! startup and rewritten in full after every mutation.

mod photos;
mod repository;

pub use photos::*;
pub use repository::*;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::AppError;
use crate::models::Document;

/// Read the persisted document.
///
/// A missing file yields an empty document. A file that cannot be parsed also
/// yields an empty document; the unreadable content is moved aside to
/// `<path>.corrupt` (or `<path>.corrupt.N` when earlier backups exist) first so
/// the next save does not destroy it.
pub async fn load_document(path: &Path) -> Result<Document, AppError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!("No document at {:?}, starting empty", path);
            return Ok(Document::default());
        }
        Err(err) => return Err(err.into()),
    };

    match serde_json::from_slice::<Document>(&bytes) {
        Ok(document) => {
            tracing::info!(
                "Loaded {} alumni and {} batch counters from {:?}",
                document.alumni.len(),
                document.batch_counts.len(),
                path
            );
            Ok(document)
        }
        Err(err) => {
            let aside = corrupt_path(path).await;
            tracing::warn!(
                "Document {:?} is unreadable ({}), moving it to {:?} and starting empty",
                path,
                err,
                aside
            );
            if let Err(rename_err) = fs::rename(path, &aside).await {
                tracing::warn!(
                    "Could not move {:?} to {:?} ({}), the next save will replace it",
                    path,
                    aside,
                    rename_err
                );
            }
            Ok(Document::default())
        }
    }
}

/// Write the full document, replacing any prior content.
pub async fn save_document(path: &Path, document: &Document) -> Result<(), AppError> {
    let json = serde_json::to_vec_pretty(document)?;
    atomic_write(path, &json).await
}

/// Write to a sibling temp file, then rename over the target.
async fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

/// First backup name for `path` that is not taken yet.
async fn corrupt_path(path: &Path) -> PathBuf {
    let mut base = path.as_os_str().to_owned();
    base.push(".corrupt");

    let mut candidate = PathBuf::from(&base);
    let mut suffix = 1u32;
    while fs::try_exists(&candidate).await.unwrap_or(false) {
        let mut name = base.clone();
        name.push(format!(".{}", suffix));
        candidate = PathBuf::from(name);
        suffix += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_input;
    use crate::models::{Alumni, Batch};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let doc = load_document(&dir.path().join("absent.json")).await.unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty_and_is_kept_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alumni_data.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let doc = load_document(&path).await.unwrap();
        assert!(doc.is_empty());
        assert!(!path.exists());
        assert_eq!(
            std::fs::read(dir.path().join("alumni_data.json.corrupt")).unwrap(),
            b"{ not json"
        );
    }

    #[tokio::test]
    async fn test_repeated_corruption_keeps_every_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alumni_data.json");

        std::fs::write(&path, b"first broken").unwrap();
        assert!(load_document(&path).await.unwrap().is_empty());
        std::fs::write(&path, b"second broken").unwrap();
        assert!(load_document(&path).await.unwrap().is_empty());

        assert_eq!(
            std::fs::read(dir.path().join("alumni_data.json.corrupt")).unwrap(),
            b"first broken"
        );
        assert_eq!(
            std::fs::read(dir.path().join("alumni_data.json.corrupt.1")).unwrap(),
            b"second broken"
        );
    }

    #[tokio::test]
    async fn test_wide_counters_do_not_discard_the_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alumni_data.json");
        std::fs::write(
            &path,
            br#"{"alumni":{},"batch_counts":{"2008-10":5000000000,"2010-12":7}}"#,
        )
        .unwrap();

        let doc = load_document(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(doc.batch_counts.current("2008-10"), 5_000_000_000);
        assert_eq!(doc.batch_counts.current("2010-12"), 7);
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_records_and_counters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("alumni_data.json");

        let batch = Batch::parse("2008-10").unwrap();
        let mut doc = Document::default();
        let id = doc.batch_counts.mint(&batch).unwrap();
        let profile = sample_input("2008-10").into_profile().unwrap();
        doc.alumni
            .insert(id.clone(), Alumni::new(id.clone(), &batch, profile));
        doc.batch_counts.mint(&batch).unwrap();

        save_document(&path, &doc).await.unwrap();
        assert!(!path.with_extension("tmp").exists());

        let loaded = load_document(&path).await.unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(loaded.batch_counts.current("2008-10"), 2);
    }
}
