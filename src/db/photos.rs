//! Flat-directory storage for profile photos.
//!
//! One file per record, named after the record identifier. Every upload is
//! stored under the same extension regardless of the submitted format.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tokio::fs;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::errors::AppError;

/// Extension every stored photo is normalized to.
pub const PHOTO_EXTENSION: &str = "jpg";

/// Photo files for all records, kept in a single directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the photo directory if it does not exist yet.
    pub async fn init(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name a photo for `id` is stored under.
    pub fn filename_for(id: &str) -> String {
        format!("{}.{}", id, PHOTO_EXTENSION)
    }

    /// Path inside the photo directory for a recorded filename.
    ///
    /// Names that are not a single plain path component resolve to `None`, so
    /// a stored reference can never point outside the directory.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let candidate = Path::new(filename);
        let is_plain = candidate.file_name().and_then(|n| n.to_str()) == Some(filename);
        if !is_plain || filename == "." || filename == ".." {
            return None;
        }
        Some(self.dir.join(candidate))
    }

    /// Whether a regular file exists under `filename`.
    pub async fn exists(&self, filename: &str) -> bool {
        match self.resolve(filename) {
            Some(path) => fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            None => false,
        }
    }

    /// Write (or overwrite) the photo for `id` and return its file name.
    pub async fn write(&self, id: &str, bytes: &[u8]) -> Result<String, AppError> {
        let filename = Self::filename_for(id);
        let path = self.dir.join(&filename);
        fs::create_dir_all(&self.dir).await?;
        fs::write(&path, bytes).await?;
        Ok(filename)
    }

    /// Read a stored photo, or `None` if no such file exists.
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, AppError> {
        if !self.exists(filename).await {
            return Ok(None);
        }
        let Some(path) = self.resolve(filename) else {
            return Ok(None);
        };
        Ok(Some(fs::read(&path).await?))
    }

    /// Move the photo stored for `from_id` to the name for `to_id`.
    ///
    /// Returns the new file name, or `None` when `from_id` had no photo.
    pub async fn rename(&self, from_id: &str, to_id: &str) -> Result<Option<String>, AppError> {
        let from = Self::filename_for(from_id);
        if !self.exists(&from).await {
            return Ok(None);
        }
        let to = Self::filename_for(to_id);
        fs::rename(self.dir.join(&from), self.dir.join(&to)).await?;
        Ok(Some(to))
    }

    /// Delete a stored photo. Returns whether a file was removed.
    pub async fn remove(&self, filename: &str) -> Result<bool, AppError> {
        if !self.exists(filename).await {
            return Ok(false);
        }
        let Some(path) = self.resolve(filename) else {
            return Ok(false);
        };
        fs::remove_file(&path).await?;
        Ok(true)
    }

    /// Build a ZIP archive holding every file in the photo directory.
    ///
    /// Entries are stored by bare file name, in name order.
    pub async fn archive(&self) -> Result<Vec<u8>, AppError> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || build_archive(&dir))
            .await
            .map_err(|e| AppError::Internal(format!("Archive task failed: {}", e)))?
    }
}

fn build_archive(dir: &Path) -> Result<Vec<u8>, AppError> {
    let mut files = Vec::new();
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    files.push(entry.path());
                }
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    files.sort();

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let content = std::fs::read(path)?;
            zip.start_file(name, options)?;
            zip.write_all(&content)?;
        }

        zip.finish()?;
    }

    tracing::info!("Archived {} photos from {:?}", files.len(), dir);
    Ok(buffer)
}
