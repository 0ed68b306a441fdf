//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | Lanczos3, width- or height-bounded |
//! | **Crop** | fill-resize + gravity-anchored cut |
//! | **Region crop** | literal `WxH+X+Y` cut + fit-within resize |
//! | **Copy** | `std::fs::copy` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use params::{
    CropParams, CropRegion, Gravity, Quality, RegionCropParams, ResizeParams, UnknownGravity,
};
pub use rust_backend::RustBackend;
