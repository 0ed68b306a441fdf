//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`engine`](crate::engine) (which decides which
//! derivative action to take) and the [`backend`](super::backend) (which does
//! the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Gravity`]: Anchor point for crops (`NorthWest` … `SouthEast`).
//! - [`CropRegion`]: Literal pixel region in `WxH+X+Y` form.
//! - [`ResizeParams`]: Aspect-preserving resize bounded by width and/or height.
//! - [`CropParams`]: Fill-resize then crop to an exact box at a gravity anchor.
//! - [`RegionCropParams`]: Crop a literal region, then fit it into a box.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Convert an instruction quality in `(0, 1]` to the 1–100 encoder scale.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() {
            return Self::default();
        }
        Self::new((fraction * 100.0).round().clamp(0.0, 100.0) as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Anchor used when a crop box differs from the (scaled) source proportions.
///
/// Names follow the compass convention used by most image tools and parse
/// case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    #[default]
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Gravity {
    /// Horizontal and vertical anchor fractions: 0.0 = left/top, 1.0 = right/bottom.
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Gravity::NorthWest => (0.0, 0.0),
            Gravity::North => (0.5, 0.0),
            Gravity::NorthEast => (1.0, 0.0),
            Gravity::West => (0.0, 0.5),
            Gravity::Center => (0.5, 0.5),
            Gravity::East => (1.0, 0.5),
            Gravity::SouthWest => (0.0, 1.0),
            Gravity::South => (0.5, 1.0),
            Gravity::SouthEast => (1.0, 1.0),
        }
    }
}

/// Error returned when a gravity name is not one of the nine compass anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGravity(pub String);

impl fmt::Display for UnknownGravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown gravity '{}'", self.0)
    }
}

impl std::error::Error for UnknownGravity {}

impl FromStr for Gravity {
    type Err = UnknownGravity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gravity = match s.to_ascii_lowercase().as_str() {
            "northwest" => Gravity::NorthWest,
            "north" => Gravity::North,
            "northeast" => Gravity::NorthEast,
            "west" => Gravity::West,
            "center" | "centre" => Gravity::Center,
            "east" => Gravity::East,
            "southwest" => Gravity::SouthWest,
            "south" => Gravity::South,
            "southeast" => Gravity::SouthEast,
            _ => return Err(UnknownGravity(s.to_string())),
        };
        Ok(gravity)
    }
}

/// A literal pixel region: `width x height + x + y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRegion {
    /// Parse a strict `WxH+X+Y` string. Anything else (whitespace, signs,
    /// missing offsets) yields `None`, as does a number too large for `u32`.
    ///
    /// - `"400x600+800+300"` → region 400×600 at (800, 300)
    /// - `"400x600"` → `None`
    /// - `" 400x600+0+0"` → `None`
    pub fn parse(s: &str) -> Option<Self> {
        let (size, offsets) = s.split_once('+')?;
        let (x, y) = offsets.split_once('+')?;
        let (width, height) = size.split_once('x')?;
        Some(Self {
            width: parse_digits(width)?,
            height: parse_digits(height)?,
            x: parse_digits(x)?,
            y: parse_digits(y)?,
        })
    }
}

/// Parse a non-empty run of ASCII digits. Rejects the `+` prefix that
/// `u32::from_str` would otherwise accept.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Parameters for an aspect-preserving resize.
///
/// When only one bound is set the other edge scales proportionally. When both
/// are set the image is scaled to fit within the box.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Quality,
}

/// Parameters for a gravity-anchored crop to an exact box.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
    pub quality: Quality,
}

/// Parameters for a literal region crop followed by a fit-within resize.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub region: CropRegion,
    /// Box the cropped region is resized to fit within.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
