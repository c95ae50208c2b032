//! Exercise image storage
//!
//! Images are checked against the accepted MIME types and the configured size
//! limit, then written under the storage directory with a generated name.

use crate::config::StorageConfig;
use crate::error::UploadError;
use chrono::Utc;
use diet_tracker_shared::validation::image_extension;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image received from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Filesystem store for exercise images
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.image_dir, config.max_image_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check type and size, returning the file extension to store under
    pub fn check(&self, image: &UploadedImage) -> Result<&'static str, UploadError> {
        let extension = image_extension(&image.content_type)
            .map_err(|_| UploadError::UnsupportedType(image.content_type.clone()))?;

        if image.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }

        Ok(extension)
    }

    /// Store an image and return its generated file name
    pub async fn save(&self, image: &UploadedImage) -> Result<String, UploadError> {
        let extension = self.check(image)?;
        let file_name = generate_file_name(extension);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), &image.bytes).await?;

        debug!(file = %file_name, bytes = image.bytes.len(), "Stored exercise image");
        Ok(file_name)
    }
}

/// `exercise-<unix millis>-<8 hex>.<ext>`
fn generate_file_name(extension: &str) -> String {
    format!(
        "exercise-{}-{:08x}.{}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>(),
        extension
    )
}
