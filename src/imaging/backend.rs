//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the five operations the derivative
//! engine needs: identify, resize, crop, crop_region, and copy.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and built on the
//! `image` crate.

use super::params::{CropParams, RegionCropParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Every backend must implement all five operations so the engine is
/// backend-agnostic. Implementations must be `Sync`: one factory may serve
/// several batches from different threads.
pub trait ImageBackend: Sync {
    /// Get image dimensions. Fails on unreadable or missing files.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Aspect-preserving resize to the given bound(s).
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Fill-resize and crop to an exact box anchored by gravity.
    fn crop(&self, params: &CropParams) -> Result<(), BackendError>;

    /// Crop a literal pixel region, then resize it to fit the target box.
    fn crop_region(&self, params: &RegionCropParams) -> Result<(), BackendError>;

    /// Byte-for-byte copy, no transformation.
    fn copy(&self, source: &Path, output: &Path) -> Result<(), BackendError>;
}
