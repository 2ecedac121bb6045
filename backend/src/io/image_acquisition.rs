//! Image acquisition boundary.
//!
//! Platform pickers can fail in many ways (permission denied, user cancel,
//! unreadable file). [`acquire_image`] turns all of them into `None` so no
//! error crosses into the board logic.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Camera,
    Gallery,
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Camera => f.write_str("camera"),
            ImageKind::Gallery => f.write_str("gallery"),
        }
    }
}

/// A source of user photos. `Ok(None)` means the user backed out.
#[async_trait]
pub trait ImageAcquirer: Send + Sync {
    async fn acquire(&self, kind: ImageKind) -> Result<Option<PathBuf>>;
}

/// Path of the acquired photo, or `None` on any failure
pub async fn acquire_image(acquirer: &dyn ImageAcquirer, kind: ImageKind) -> Option<PathBuf> {
    match acquirer.acquire(kind).await {
        Ok(Some(path)) => {
            debug!("Acquired {} image at {}", kind, path.display());
            Some(path)
        }
        Ok(None) => {
            debug!("No {} image returned", kind);
            None
        }
        Err(e) => {
            warn!("Failed to acquire {} image: {:#}", kind, e);
            None
        }
    }
}

/// Acquirer over a file the host has already picked, e.g. from a file dialog
#[derive(Debug, Clone)]
pub struct SuppliedImage {
    path: Option<PathBuf>,
}

impl SuppliedImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The host's picker was dismissed
    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl ImageAcquirer for SuppliedImage {
    async fn acquire(&self, _kind: ImageKind) -> Result<Option<PathBuf>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Cannot read image {}", path.display()))?;
        if !metadata.is_file() {
            bail!("{} is not a file", path.display());
        }
        Ok(Some(path.clone()))
    }
}
