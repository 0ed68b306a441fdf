//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only, no full decode) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with format sniffing |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Gravity crop | fill-resize + `crop_imm` at the gravity offset |
//! | Region crop | `crop_imm` on the clamped region, then fit-within resize |
//! | Encode | by output extension; JPEG honors quality, the rest are lossless |
//! | Copy | `std::fs::copy` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{
    calculate_fill_dimensions, clamp_region, fit_within, gravity_offset, scale_to_height,
    scale_to_width,
};
use super::params::{CropParams, RegionCropParams, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::path::Path;

/// Extensions whose encoders and decoders are compiled in.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp", "gif", "bmp"];

/// Returns the set of image file extensions the backend can read and write.
pub fn supported_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn image_error(context: &str, path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::ProcessingFailed(format!("{context} {}: {other}", path.display())),
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| image_error("Failed to decode", path, e))
}

fn output_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let format = match output_extension(path).as_str() {
        "jpg" | "jpeg" => return save_jpeg(img, path, quality),
        "png" => ImageFormat::Png,
        "tif" | "tiff" => ImageFormat::Tiff,
        "webp" => ImageFormat::WebP,
        "gif" => ImageFormat::Gif,
        "bmp" => ImageFormat::Bmp,
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {}",
                other
            )));
        }
    };
    img.save_with_format(path, format)
        .map_err(|e| image_error("Failed to encode", path, e))
}

/// Encode as baseline JPEG. JPEG has no alpha channel, so the image is
/// flattened to RGB first.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| image_error("Failed to encode", path, e))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| image_error("Failed to read dimensions of", path, e))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let source = (img.width(), img.height());
        let (width, height) = match (params.width, params.height) {
            (Some(w), Some(h)) => fit_within(source, (w, h)),
            (Some(w), None) => scale_to_width(source, w),
            (None, Some(h)) => scale_to_height(source, h),
            (None, None) => source,
        };
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.quality.value())
    }

    fn crop(&self, params: &CropParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let target = (params.width, params.height);

        // Fill-resize so the box is fully covered, then cut at the anchor
        let (fill_w, fill_h) = calculate_fill_dimensions((img.width(), img.height()), target);
        let filled = img.resize_exact(fill_w, fill_h, FilterType::Lanczos3);
        let (x, y) = gravity_offset((fill_w, fill_h), target, params.gravity);
        let cropped = filled.crop_imm(x, y, params.width, params.height);

        save_image(&cropped, &params.output, params.quality.value())
    }

    fn crop_region(&self, params: &RegionCropParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let region = clamp_region(params.region, (img.width(), img.height())).ok_or_else(|| {
            BackendError::ProcessingFailed(format!(
                "Crop region {} lies outside {}x{} image {}",
                params.region,
                img.width(),
                img.height(),
                params.source.display()
            ))
        })?;

        let cropped = img.crop_imm(region.x, region.y, region.width, region.height);
        let (width, height) = fit_within(
            (region.width, region.height),
            (params.width, params.height),
        );
        let resized = cropped.resize_exact(width, height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.quality.value())
    }

    fn copy(&self, source: &Path, output: &Path) -> Result<(), BackendError> {
        std::fs::copy(source, output)?;
        Ok(())
    }
}
