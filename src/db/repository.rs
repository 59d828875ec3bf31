//! Alumni repository: every record operation on top of the persisted document.
//!
//! The document lives in memory behind a lock. A mutation stages its changes on
//! a copy, flushes the copy to disk, and only then publishes it, so a failed
//! save never leaves memory and disk disagreeing.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use super::{load_document, save_document, PhotoStore};
use crate::errors::AppError;
use crate::models::{Alumni, AlumniFilter, AlumniInput, Batch, Document, Sort};

/// Repository for all alumni and photo operations.
pub struct Repository {
    document_path: PathBuf,
    photos: PhotoStore,
    document: RwLock<Document>,
}

impl Repository {
    /// Load the document at `document_path` and prepare the photo directory.
    pub async fn open(
        document_path: impl Into<PathBuf>,
        photos: PhotoStore,
    ) -> Result<Self, AppError> {
        let document_path = document_path.into();
        let document = load_document(&document_path).await?;
        photos.init().await?;

        Ok(Self {
            document_path,
            photos,
            document: RwLock::new(document),
        })
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    /// Get a copy of the whole document.
    pub async fn get_document(&self) -> Document {
        self.document.read().await.clone()
    }

    /// Persist `staged` and make it the current document.
    async fn commit(&self, current: &mut Document, staged: Document) -> Result<(), AppError> {
        save_document(&self.document_path, &staged).await?;
        *current = staged;
        Ok(())
    }

    // ==================== READ OPERATIONS ====================

    /// List alumni matching `filter`, optionally ordered by `sort`.
    pub async fn list_alumni(&self, filter: &AlumniFilter, sort: Option<Sort>) -> Vec<Alumni> {
        let document = self.document.read().await;
        let mut results: Vec<Alumni> = document
            .alumni
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        drop(document);

        if let Some(sort) = sort {
            sort.apply(&mut results);
        }
        results
    }

    /// Get an alumni record by identifier.
    pub async fn get_alumni(&self, id: &str) -> Option<Alumni> {
        self.document.read().await.alumni.get(id).cloned()
    }

    // ==================== WRITE OPERATIONS ====================

    /// Create a record under a freshly minted identifier and return the identifier.
    pub async fn create_alumni(&self, input: AlumniInput) -> Result<String, AppError> {
        let batch = input.batch()?;
        let profile = input.into_profile()?;

        let mut document = self.document.write().await;
        let mut staged = document.clone();

        let id = staged.batch_counts.mint(&batch)?;
        if staged.alumni.contains_key(&id) {
            return Err(AppError::Conflict(format!("Alumni ID {} already exists", id)));
        }
        staged
            .alumni
            .insert(id.clone(), Alumni::new(id.clone(), &batch, profile));

        self.commit(&mut document, staged).await?;
        tracing::info!("Created alumni {}", id);
        Ok(id)
    }

    /// Replace the fields of an existing record.
    ///
    /// The identifier and batch are never changed here. Leaving out the photo
    /// reference keeps the one already stored.
    pub async fn update_alumni(&self, id: &str, input: AlumniInput) -> Result<Alumni, AppError> {
        let mut profile = input.into_profile()?;

        let mut document = self.document.write().await;
        let existing = document
            .alumni
            .get(id)
            .ok_or_else(|| AppError::alumni_not_found(id))?;

        if profile.profile_photo.as_deref().map_or(true, str::is_empty) {
            profile.profile_photo = existing.profile.profile_photo.clone();
        }
        let updated = Alumni {
            id: existing.id.clone(),
            batch: existing.batch.clone(),
            profile,
        };

        let mut staged = document.clone();
        staged.alumni.insert(id.to_string(), updated.clone());

        self.commit(&mut document, staged).await?;
        tracing::info!("Updated alumni {}", id);
        Ok(updated)
    }

    /// Delete a record and its photo file. Batch counters are left untouched.
    pub async fn delete_alumni(&self, id: &str) -> Result<(), AppError> {
        let mut document = self.document.write().await;
        let mut staged = document.clone();

        let removed = staged
            .alumni
            .shift_remove(id)
            .ok_or_else(|| AppError::alumni_not_found(id))?;

        self.commit(&mut document, staged).await?;

        if let Some(photo) = removed.profile.profile_photo.as_deref() {
            if self.photos.remove(photo).await? {
                tracing::info!("Removed photo {} of alumni {}", photo, id);
            }
        }

        tracing::info!("Deleted alumni {}", id);
        Ok(())
    }

    /// Move a record to another batch, which gives it a new identifier.
    ///
    /// A photo stored under the old identifier is renamed to match. The old
    /// identifier is gone afterwards and its sequence number is not reused.
    /// If the document cannot be saved, the photo rename is undone.
    pub async fn reassign_batch(&self, old_id: &str, new_batch: &str) -> Result<String, AppError> {
        let new_batch = Batch::parse(new_batch)?;

        let mut document = self.document.write().await;
        let mut staged = document.clone();

        let mut record = staged
            .alumni
            .shift_remove(old_id)
            .ok_or_else(|| AppError::alumni_not_found(old_id))?;

        let new_id = staged.batch_counts.mint(&new_batch)?;
        if staged.alumni.contains_key(&new_id) {
            return Err(AppError::Conflict(format!(
                "Alumni ID {} already exists",
                new_id
            )));
        }

        let renamed_photo = self.photos.rename(old_id, &new_id).await?;
        if let Some(filename) = &renamed_photo {
            record.profile.profile_photo = Some(filename.clone());
        }

        record.id = new_id.clone();
        record.batch = new_batch.as_str().to_string();
        staged.alumni.insert(new_id.clone(), record);

        if let Err(err) = self.commit(&mut document, staged).await {
            if renamed_photo.is_some() {
                if let Err(undo) = self.photos.rename(&new_id, old_id).await {
                    tracing::warn!(
                        "Failed to restore photo of {} after aborted reassignment: {}",
                        old_id,
                        undo
                    );
                }
            }
            return Err(err);
        }

        tracing::info!("Reassigned alumni {} to {}", old_id, new_id);
        Ok(new_id)
    }

    // ==================== PHOTO OPERATIONS ====================

    /// Store (or replace) the photo of an existing record and return its file name.
    pub async fn store_photo(&self, id: &str, bytes: &[u8]) -> Result<String, AppError> {
        let mut document = self.document.write().await;
        if !document.alumni.contains_key(id) {
            return Err(AppError::alumni_not_found(id));
        }

        let filename = self.photos.write(id, bytes).await?;

        let mut staged = document.clone();
        if let Some(record) = staged.alumni.get_mut(id) {
            record.profile.profile_photo = Some(filename.clone());
        }

        self.commit(&mut document, staged).await?;
        tracing::info!("Stored photo {} ({} bytes)", filename, bytes.len());
        Ok(filename)
    }

    /// Read the photo of a record.
    ///
    /// Uses the recorded file name, falling back to the name derived from the
    /// identifier.
    pub async fn read_photo(&self, id: &str) -> Result<(String, Vec<u8>), AppError> {
        let filename = {
            let document = self.document.read().await;
            let record = document
                .alumni
                .get(id)
                .ok_or_else(|| AppError::alumni_not_found(id))?;
            record
                .profile
                .profile_photo
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| PhotoStore::filename_for(id))
        };

        match self.photos.read(&filename).await? {
            Some(bytes) => Ok((filename, bytes)),
            None => Err(AppError::NotFound("Profile photo not found".to_string())),
        }
    }

    // ==================== EXPORT OPERATIONS ====================

    /// Raw bytes of the persisted document file.
    pub async fn export_document(&self) -> Result<Vec<u8>, AppError> {
        let _document = self.document.read().await;
        match tokio::fs::read(&self.document_path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                "Document file not found".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// ZIP archive of every stored photo.
    pub async fn export_photos(&self) -> Result<Vec<u8>, AppError> {
        self.photos.archive().await
    }
}
