use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use ridebook_core::upload::stored_file_name;
use ridebook_core::{CoreError, CoreResult, UploadConfig};

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: i64 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    /// Path recorded on the booking, e.g. `images/imageData-1700000000000.png`.
    pub public_path: String,
    pub size: usize,
}

/// Writes uploaded images into the configured uploads directory.
pub struct ImageStore {
    config: UploadConfig,
}

impl ImageStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    pub fn max_file_bytes(&self) -> usize {
        self.config.max_file_bytes
    }

    pub async fn ensure_dir(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| CoreError::UploadError(format!("cannot create {}: {}", self.config.dir.display(), e)))
    }

    /// Stores `data` under `<field>-<millis><ext>`. A name already taken on disk moves the
    /// timestamp forward instead of overwriting.
    pub async fn save(&self, field_name: &str, original_name: &str, data: &[u8]) -> CoreResult<StoredImage> {
        if data.len() > self.config.max_file_bytes {
            return Err(CoreError::UploadError(format!(
                "file is {} bytes, limit is {}",
                data.len(),
                self.config.max_file_bytes
            )));
        }

        self.ensure_dir().await?;

        let started = Utc::now().timestamp_millis();
        for offset in 0..MAX_NAME_ATTEMPTS {
            let file_name = stored_file_name(field_name, started + offset, original_name);
            let path = self.config.dir.join(&file_name);

            let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Upload name {} taken, retrying", file_name);
                    continue;
                }
                Err(e) => return Err(CoreError::UploadError(e.to_string())),
            };

            let written = async {
                file.write_all(data).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                discard_partial(&path).await;
                return Err(CoreError::UploadError(e.to_string()));
            }

            info!("Saved uploaded image: {} ({} bytes)", file_name, data.len());
            return Ok(StoredImage {
                public_path: self.config.public_path(&file_name),
                file_name,
                size: data.len(),
            });
        }

        Err(CoreError::UploadError("no free file name for upload".to_string()))
    }
}

/// Removes a partially written upload. A failed removal is logged and left on disk.
async fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            warn!("Failed to remove partial upload {}: {}", path.display(), e);
            false
        }
    }
}
