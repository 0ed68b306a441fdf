//! Shared test utilities.
//!
//! Synthetic source images for exercising the real backend without checked-in
//! fixtures.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let source = tmp.path().join("kitty.jpg");
//! create_test_jpeg(&source, 1200, 1800);
//! ```

use image::{ImageBuffer, Rgb};
use std::path::Path;

/// Write a `width`×`height` JPEG with a horizontal/vertical gradient.
///
/// The gradient keeps crops at different gravities visually distinct.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    img.save(path).unwrap();
}

#[test]
fn create_test_jpeg_has_requested_size() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("gradient.jpg");
    create_test_jpeg(&path, 32, 16);
    assert_eq!(image::image_dimensions(&path).unwrap(), (32, 16));
}
