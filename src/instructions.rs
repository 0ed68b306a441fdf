//! Instruction registry: named sizing policies grouped by image type.
//!
//! An *instruction* says how to derive one variant (`thumbnail`, `main`, …)
//! from a source image. Instructions are scoped to a *type* (`product`,
//! `user`, …) and applied in the order they were registered.
//!
//! ## Ingestion
//!
//! Input arrives loosely typed, either as an [`InstructionSpec`] built in Rust
//! or as JSON/TOML values. Every spec is validated once, on ingestion:
//!
//! - `type` and `label` must be strings; `width` and `height` must be numbers
//!   that round to at least one pixel.
//! - Invalid specs are dropped without error. Callers can compare
//!   [`InstructionRegistry::count`] before and after to detect drops.
//! - Optional fields (`gravity`, `quality`, `crop`, `force`) fall back to the
//!   registry's [`InstructionDefaults`] when absent or of the wrong type.
//!
//! The registry only grows; there is no removal or in-place edit.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_GRAVITY: &str = "Center";
pub const DEFAULT_QUALITY: f64 = 0.9;

/// Values applied to optional instruction fields during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionDefaults {
    pub gravity: String,
    pub quality: f64,
    pub crop: bool,
    pub force: bool,
}

impl Default for InstructionDefaults {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY.to_string(),
            quality: DEFAULT_QUALITY,
            crop: false,
            force: true,
        }
    }
}

/// Raw, unvalidated instruction as supplied by a caller.
///
/// Every field is optional so that incomplete input can be represented and
/// rejected by [`InstructionRegistry::add`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionSpec {
    pub type_name: Option<String>,
    pub label: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub gravity: Option<String>,
    pub quality: Option<f64>,
    pub crop: Option<bool>,
    pub force: Option<bool>,
}

impl InstructionSpec {
    /// Spec with all required fields set.
    pub fn new(type_name: &str, label: &str, width: u32, height: u32) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            label: Some(label.to_string()),
            width: Some(width as f64),
            height: Some(height as f64),
            ..Self::default()
        }
    }

    pub fn gravity(mut self, gravity: &str) -> Self {
        self.gravity = Some(gravity.to_string());
        self
    }

    pub fn quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn crop(mut self, crop: bool) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    /// Read a spec from a JSON object. Fields of the wrong JSON type are
    /// treated as absent. Returns `None` for anything that is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let string = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| obj.get(key).and_then(Value::as_f64);
        let boolean = |key: &str| obj.get(key).and_then(Value::as_bool);

        Some(Self {
            type_name: string("type"),
            label: string("label"),
            width: number("width"),
            height: number("height"),
            gravity: string("gravity"),
            quality: number("quality"),
            crop: boolean("crop"),
            force: boolean("force"),
        })
    }
}

/// A validated, normalized instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub gravity: String,
    /// Encoding quality in `(0, 1]`.
    pub quality: f64,
    /// Always crop to exactly `width`×`height`.
    pub crop: bool,
    /// Process images smaller than the target box instead of skipping them.
    pub force: bool,
}

/// Round a numeric dimension to whole pixels; `None` if it is not a usable size.
fn to_pixels(value: f64) -> Option<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 1.0 || rounded > u32::MAX as f64 {
        return None;
    }
    Some(rounded as u32)
}

impl Instruction {
    /// Validate a spec and apply defaults. Returns the type name alongside
    /// the instruction, or `None` if a required field is missing or unusable.
    pub fn from_spec(
        spec: &InstructionSpec,
        defaults: &InstructionDefaults,
    ) -> Option<(String, Self)> {
        let type_name = spec.type_name.clone()?;
        let label = spec.label.clone()?;
        let width = to_pixels(spec.width?)?;
        let height = to_pixels(spec.height?)?;

        let quality = match spec.quality {
            Some(q) if q > 0.0 && q <= 1.0 => q,
            _ => defaults.quality,
        };

        Some((
            type_name,
            Self {
                label,
                width,
                height,
                gravity: spec
                    .gravity
                    .clone()
                    .unwrap_or_else(|| defaults.gravity.clone()),
                quality,
                crop: spec.crop.unwrap_or(defaults.crop),
                force: spec.force.unwrap_or(defaults.force),
            },
        ))
    }
}

/// Ordered instruction sets keyed by image type.
#[derive(Debug, Clone, Default)]
pub struct InstructionRegistry {
    defaults: InstructionDefaults,
    instructions: BTreeMap<String, Vec<Instruction>>,
    count: usize,
}

impl InstructionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: InstructionDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &InstructionDefaults {
        &self.defaults
    }

    /// Validate, normalize and append each spec under its type.
    ///
    /// A single spec can be passed as `[spec]` or `Some(spec)`. Returns how
    /// many specs were accepted by this call.
    pub fn add<I>(&mut self, specs: I) -> usize
    where
        I: IntoIterator<Item = InstructionSpec>,
    {
        let mut added = 0;
        for spec in specs {
            let Some((type_name, instruction)) = Instruction::from_spec(&spec, &self.defaults)
            else {
                warn!(?spec, "dropping invalid instruction");
                continue;
            };
            debug!(
                type_name = %type_name,
                label = %instruction.label,
                width = instruction.width,
                height = instruction.height,
                "registered instruction"
            );
            self.instructions
                .entry(type_name)
                .or_default()
                .push(instruction);
            added += 1;
        }
        self.count += added;
        added
    }

    /// Add loosely typed input: a single object or an array of objects.
    /// Any other value, including `null`, adds nothing.
    pub fn add_value(&mut self, value: &Value) -> usize {
        match value {
            Value::Array(items) => self.add(items.iter().filter_map(InstructionSpec::from_value)),
            other => self.add(InstructionSpec::from_value(other)),
        }
    }

    /// Number of instructions successfully added so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.instructions.contains_key(type_name)
    }

    /// Instructions for a type in application order.
    pub fn get(&self, type_name: &str) -> Option<&[Instruction]> {
        self.instructions.get(type_name).map(Vec::as_slice)
    }

    /// Registered type names, sorted.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.instructions.keys().map(String::as_str)
    }

    /// Full type → instructions mapping.
    pub fn as_map(&self) -> &BTreeMap<String, Vec<Instruction>> {
        &self.instructions
    }
}
