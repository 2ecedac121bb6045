//! Building an activity card from the user's own photo.

use shared::{Activity, CustomActivity, ImageRef};
use std::path::PathBuf;

use super::errors::ValidationError;
use crate::io::image_acquisition::{acquire_image, ImageAcquirer, ImageKind};

/// Card being put together in the "create card" dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomCardDraft {
    pub title: String,
    pub image: Option<PathBuf>,
}

impl CustomCardDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the platform for a photo. A failed or cancelled pick leaves the
    /// current image in place and returns false.
    pub async fn pick_image(&mut self, acquirer: &dyn ImageAcquirer, kind: ImageKind) -> bool {
        match acquire_image(acquirer, kind).await {
            Some(path) => {
                self.image = Some(path);
                true
            }
            None => false,
        }
    }

    pub fn check_title(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            Err(ValidationError::MissingTitle)
        } else {
            Ok(())
        }
    }

    /// The finished card. Needs both a photo and a non-blank title.
    pub fn build(&self) -> Result<Activity, ValidationError> {
        let title = self.title.trim();
        match &self.image {
            Some(image) if !title.is_empty() => Ok(Activity::Custom(CustomActivity {
                name: title.to_string(),
                image: ImageRef {
                    uri: image.to_string_lossy().into_owned(),
                },
            })),
            _ => Err(ValidationError::MissingImage),
        }
    }
}
