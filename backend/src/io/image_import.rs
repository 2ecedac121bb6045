//! Copies user photos into the data directory so cards keep working after
//! the original file is moved or deleted.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use super::image_acquisition::{ImageAcquirer, ImageKind};

/// Subdirectory of the data directory holding imported photos
pub const IMAGES_DIRECTORY: &str = "images";

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone)]
pub struct ImageImporter {
    images_directory: PathBuf,
}

impl ImageImporter {
    pub fn new(images_directory: impl Into<PathBuf>) -> Self {
        Self {
            images_directory: images_directory.into(),
        }
    }

    pub fn for_data_directory(data_directory: &Path) -> Self {
        Self::new(data_directory.join(IMAGES_DIRECTORY))
    }

    pub fn images_directory(&self) -> &Path {
        &self.images_directory
    }

    /// Copy `source` to `<images>/<uuid>.<ext>` and return the new path
    pub async fn import(&self, source: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.images_directory)
            .await
            .with_context(|| format!("Failed to create {}", self.images_directory.display()))?;

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let target = self
            .images_directory
            .join(format!("{}.{}", Uuid::new_v4(), extension));

        tokio::fs::copy(source, &target)
            .await
            .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;

        info!("Imported image {} as {}", source.display(), target.display());
        Ok(target)
    }
}

/// Wraps another acquirer and imports whatever it returns
pub struct ImportingAcquirer<A> {
    inner: A,
    importer: ImageImporter,
}

impl<A: ImageAcquirer> ImportingAcquirer<A> {
    pub fn new(inner: A, importer: ImageImporter) -> Self {
        Self { inner, importer }
    }
}

#[async_trait]
impl<A: ImageAcquirer> ImageAcquirer for ImportingAcquirer<A> {
    async fn acquire(&self, kind: ImageKind) -> Result<Option<PathBuf>> {
        match self.inner.acquire(kind).await? {
            Some(path) => Ok(Some(self.importer.import(&path).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::image_acquisition::{acquire_image, SuppliedImage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_import_copies_into_images_directory() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Beach.PNG");
        std::fs::write(&source, b"png bytes").unwrap();
        let importer = ImageImporter::for_data_directory(&temp_dir.path().join("data"));

        let stored = importer.import(&source).await.unwrap();

        assert_eq!(stored.parent(), Some(importer.images_directory()));
        assert_eq!(stored.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(&stored).unwrap(), b"png bytes");
        assert!(source.exists(), "source is left in place");
    }

    #[tokio::test]
    async fn test_import_without_extension_uses_jpg() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo");
        std::fs::write(&source, b"bytes").unwrap();
        let importer = ImageImporter::new(temp_dir.path().join("images"));

        let stored = importer.import(&source).await.unwrap();

        assert_eq!(stored.extension().and_then(|e| e.to_str()), Some("jpg"));
    }

    #[tokio::test]
    async fn test_importing_acquirer() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("cat.jpg");
        std::fs::write(&source, b"cat").unwrap();
        let importer = ImageImporter::new(temp_dir.path().join("images"));

        let acquirer = ImportingAcquirer::new(SuppliedImage::new(&source), importer.clone());
        let stored = acquire_image(&acquirer, ImageKind::Camera).await.unwrap();
        assert!(stored.starts_with(importer.images_directory()));

        let cancelled = ImportingAcquirer::new(SuppliedImage::cancelled(), importer.clone());
        assert!(acquire_image(&cancelled, ImageKind::Camera).await.is_none());

        let missing = ImportingAcquirer::new(SuppliedImage::new(temp_dir.path().join("nope.jpg")), importer);
        assert!(acquire_image(&missing, ImageKind::Camera).await.is_none());
    }
}
