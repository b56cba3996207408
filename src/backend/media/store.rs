/**
 * Media Store
 *
 * Writes uploaded images to the upload directory under generated names and
 * hands back the URL they are served from. An upload that cannot be written
 * fails the request; there is no retry.
 */

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::media::form::ImageUpload;

/// URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory images are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an image and return its public URL
    ///
    /// # Errors
    ///
    /// * `Validation` - the upload is empty or not an `image/*` type
    /// * `Internal` - the file could not be written
    pub async fn save(&self, upload: &ImageUpload) -> BackendResult<String> {
        if upload.bytes.is_empty() {
            return Err(BackendError::validation("Uploaded file is empty"));
        }
        let extension = image_extension(upload)
            .ok_or_else(|| BackendError::validation("Only image uploads are allowed"))?;

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&name);

        let written = async {
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(&path, &upload.bytes).await
        }
        .await;
        if let Err(e) = written {
            tracing::error!("Failed to store upload at {}: {:?}", path.display(), e);
            return Err(BackendError::internal("Error while uploading image"));
        }

        tracing::debug!("Stored {} bytes at {}", upload.bytes.len(), path.display());
        Ok(format!("{}/{}", PUBLIC_PREFIX, name))
    }

    /// [`MediaStore::save`] for an optional upload
    pub async fn save_optional(
        &self,
        upload: Option<ImageUpload>,
    ) -> BackendResult<Option<String>> {
        match upload {
            Some(upload) => self.save(&upload).await.map(Some),
            None => Ok(None),
        }
    }

    /// Remove an image without failing the caller
    pub async fn discard(&self, url: &str) {
        if let Err(e) = self.remove(url).await {
            tracing::warn!("Could not remove upload {}: {:?}", url, e);
        }
    }

    /// Delete an image previously returned by [`MediaStore::save`]
    ///
    /// URLs this store did not produce are ignored. Returns whether a file
    /// was removed.
    pub async fn remove(&self, url: &str) -> BackendResult<bool> {
        let Some(name) = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Ok(false);
        };
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Ok(false);
        }

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn image_extension(upload: &ImageUpload) -> Option<&'static str> {
    let content_type = upload.content_type.as_deref()?.to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return None;
    }
    let ext = match content_type.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => file_name_extension(upload.file_name.as_deref()).unwrap_or("img"),
    };
    Some(ext)
}

fn file_name_extension(file_name: Option<&str>) -> Option<&'static str> {
    let ext = Path::new(file_name?).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("png"),
        "jpg" | "jpeg" => Some("jpg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "avif" => Some("avif"),
        "bmp" => Some("bmp"),
        _ => None,
    }
}
