use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Where uploaded images land and how they are exposed.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Prefix stored on the booking, and the route the directory is served under.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

fn default_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_public_prefix() -> String { "images".to_string() }
fn default_max_file_bytes() -> usize { DEFAULT_MAX_FILE_BYTES }

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            public_prefix: default_public_prefix(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl UploadConfig {
    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix.trim_matches('/'), file_name)
    }
}

/// Extension of the client-side file name, including the leading dot.
/// Dotfiles and names without a dot have none.
pub fn original_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// `<field>-<millis><ext>`
pub fn stored_file_name(field_name: &str, timestamp_millis: i64, original_name: &str) -> String {
    format!("{}-{}{}", field_name, timestamp_millis, original_extension(original_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_extension() {
        assert_eq!(original_extension("photo.png"), ".png");
        assert_eq!(original_extension("archive.tar.gz"), ".gz");
        assert_eq!(original_extension("README"), "");
        assert_eq!(original_extension(".gitignore"), "");
        assert_eq!(original_extension("../../etc/passwd.jpg"), ".jpg");
    }

    #[test]
    fn test_stored_file_name() {
        assert_eq!(stored_file_name("imageData", 1700000000123, "me.JPG"), "imageData-1700000000123.JPG");
        assert_eq!(stored_file_name("imageData", 42, "blob"), "imageData-42");
    }

    #[test]
    fn test_public_path() {
        let config = UploadConfig::default();
        assert_eq!(config.public_path("imageData-1.png"), "images/imageData-1.png");
        assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
    }
}
