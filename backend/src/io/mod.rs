//! # IO Module
//!
//! Adapters for the platform capabilities the board core consumes: getting a
//! photo from the camera or gallery, and keeping a copy of it in the app's
//! data directory.

pub mod image_acquisition;
pub mod image_import;

pub use image_acquisition::{acquire_image, ImageAcquirer, ImageKind, SuppliedImage};
pub use image_import::{ImageImporter, ImportingAcquirer, IMAGES_DIRECTORY};
