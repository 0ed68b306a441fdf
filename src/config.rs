//! Factory configuration module.
//!
//! Loads instruction defaults and instruction sets from a `factory.toml`
//! file, so a catalog's derivative policy can live next to its images instead
//! of in code.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [defaults]
//! gravity = "Center"   # Anchor for gravity crops
//! quality = 0.9        # Encoding quality in (0, 1]
//! crop = false         # Crop to the exact box
//! force = true         # Process sources smaller than the box
//!
//! [[instructions]]
//! type = "product"
//! label = "thumbnail"
//! width = 60
//! height = 40
//! crop = true
//! ```
//!
//! The `[defaults]` table is strict: unknown keys are rejected to catch typos
//! early. Instruction tables stay loosely typed and go through the same
//! validation as instructions added in code, so a malformed entry is dropped
//! (with a warning) rather than failing the whole load.

use crate::factory::ImageFactory;
use crate::imaging::{Gravity, ImageBackend, RustBackend};
use crate::instructions::{DEFAULT_GRAVITY, DEFAULT_QUALITY, InstructionDefaults, InstructionRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "factory.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Instruction conversion error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contents of `factory.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactoryConfig {
    /// Values applied to optional instruction fields.
    pub defaults: DefaultsConfig,
    /// Raw instruction tables, validated on registration.
    pub instructions: Vec<toml::Value>,
}

/// The `[defaults]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub gravity: String,
    pub quality: f64,
    pub crop: bool,
    pub force: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY.to_string(),
            quality: DEFAULT_QUALITY,
            crop: false,
            force: true,
        }
    }
}

impl From<&DefaultsConfig> for InstructionDefaults {
    fn from(config: &DefaultsConfig) -> Self {
        Self {
            gravity: config.gravity.clone(),
            quality: config.quality,
            crop: config.crop,
            force: config.force,
        }
    }
}

impl FactoryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quality = self.defaults.quality;
        if !(quality > 0.0 && quality <= 1.0) {
            return Err(ConfigError::Validation(
                "defaults.quality must be in (0, 1]".into(),
            ));
        }
        if self.defaults.gravity.parse::<Gravity>().is_err() {
            return Err(ConfigError::Validation(format!(
                "defaults.gravity '{}' is not a known gravity",
                self.defaults.gravity
            )));
        }
        Ok(())
    }

    /// Validate, then register every instruction table under the configured
    /// defaults. Invalid tables are dropped by the registry.
    pub fn into_registry(self) -> Result<InstructionRegistry, ConfigError> {
        self.validate()?;
        let mut registry = InstructionRegistry::with_defaults((&self.defaults).into());
        for table in &self.instructions {
            registry.add_value(&serde_json::to_value(table)?);
        }
        Ok(registry)
    }

    pub fn into_factory_with_backend<B: ImageBackend>(
        self,
        backend: B,
    ) -> Result<ImageFactory<B>, ConfigError> {
        Ok(ImageFactory::with_registry(backend, self.into_registry()?))
    }

    /// Factory with the pure-Rust backend.
    pub fn into_factory(self) -> Result<ImageFactory<RustBackend>, ConfigError> {
        self.into_factory_with_backend(RustBackend::new())
    }
}

/// Parse and validate config from a TOML string.
pub fn parse_config(content: &str) -> Result<FactoryConfig, ConfigError> {
    let config: FactoryConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<FactoryConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `factory.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Factory Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys in [defaults] will cause an error.

# ---------------------------------------------------------------------------
# Instruction defaults
# ---------------------------------------------------------------------------
# Applied to any instruction that leaves the field out.
[defaults]
# Anchor used when cropping to the exact box without an explicit region.
# One of: NorthWest, North, NorthEast, West, Center, East,
#         SouthWest, South, SouthEast.
gravity = "Center"

# Encoding quality as a fraction in (0, 1]. JPEG output maps this to 1-100.
quality = 0.9

# Crop to exactly width x height instead of fitting within the box.
crop = false

# Process sources smaller than the box. When false, such images are
# skipped with a message instead.
force = true

# ---------------------------------------------------------------------------
# Instructions
# ---------------------------------------------------------------------------
# Each [[instructions]] table defines one derivative for one image type.
# Required: type, label, width, height. Instructions of a type are applied
# in the order listed. Derivatives are written next to the source as
# <stem>-<label>.<ext>.
#
# [[instructions]]
# type = "product"
# label = "thumbnail"
# width = 60
# height = 40
# crop = true
#
# [[instructions]]
# type = "product"
# label = "main"
# width = 600
# height = 400
# quality = 0.75
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_instruction_defaults() {
        let config = FactoryConfig::default();
        assert_eq!(
            InstructionDefaults::from(&config.defaults),
            InstructionDefaults::default()
        );
        assert!(config.instructions.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
[defaults]
quality = 0.75
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.quality, 0.75);
        // Unspecified values should be defaults
        assert_eq!(config.defaults.gravity, "Center");
        assert!(config.defaults.force);
    }

    #[test]
    fn parse_instruction_tables() {
        let config = parse_config(
            r#"
[[instructions]]
type = "product"
label = "thumbnail"
width = 60
height = 40
crop = true

[[instructions]]
type = "product"
label = "main"
width = 600
height = 400
"#,
        )
        .unwrap();

        assert_eq!(config.instructions.len(), 2);
        assert_eq!(
            config.instructions[0].get("label").and_then(|v| v.as_str()),
            Some("thumbnail")
        );
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result = parse_config(
            r#"
[defaults]
qualty = 0.5
"#,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result = parse_config(
            r#"
[defualts]
quality = 0.5
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn instruction_tables_are_not_strict() {
        let config = parse_config(
            r#"
[[instructions]]
type = "product"
label = "main"
width = 600
height = 400
note = "ignored"
"#,
        )
        .unwrap();
        assert_eq!(config.into_registry().unwrap().count(), 1);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_quality_boundary_ok() {
        assert!(parse_config("[defaults]\nquality = 1.0\n").is_ok());
    }

    #[test]
    fn validate_quality_zero() {
        let result = parse_config("[defaults]\nquality = 0.0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_quality_too_high() {
        let result = parse_config("[defaults]\nquality = 90.0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_unknown_gravity() {
        let result = parse_config("[defaults]\ngravity = \"Middle\"\n");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("Middle"));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(FactoryConfig::default().validate().is_ok());
    }

    // =========================================================================
    // Registry construction
    // =========================================================================

    #[test]
    fn into_registry_applies_configured_defaults() {
        let config = parse_config(
            r#"
[defaults]
quality = 0.6
gravity = "North"
force = false

[[instructions]]
type = "user"
label = "avatar"
width = 64
height = 64
crop = true

[[instructions]]
type = "user"
label = "banner"
width = 1200
height = 300
quality = 0.95
"#,
        )
        .unwrap();

        let registry = config.into_registry().unwrap();
        let user = registry.get("user").unwrap();
        assert_eq!(user.len(), 2);

        assert_eq!(user[0].label, "avatar");
        assert_eq!(user[0].quality, 0.6);
        assert_eq!(user[0].gravity, "North");
        assert!(!user[0].force);
        assert!(user[0].crop);

        assert_eq!(user[1].label, "banner");
        assert_eq!(user[1].quality, 0.95);
        assert!(!user[1].crop);
    }

    #[test]
    fn into_registry_drops_incomplete_tables() {
        let config = parse_config(
            r#"
[[instructions]]
type = "product"
label = "main"

[[instructions]]
type = "product"
label = "thumbnail"
width = 60
height = 40
"#,
        )
        .unwrap();

        let registry = config.into_registry().unwrap();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get("product").unwrap()[0].label, "thumbnail");
    }

    #[test]
    fn into_factory_registers_instructions() {
        let config = parse_config(
            r#"
[[instructions]]
type = "product"
label = "main"
width = 600
height = 400
"#,
        )
        .unwrap();

        let factory = config.into_factory().unwrap();
        assert_eq!(factory.count(), 1);
        assert!(factory.instructions().contains_type("product"));
    }

    #[test]
    fn into_registry_revalidates() {
        let config = FactoryConfig {
            defaults: DefaultsConfig {
                quality: 2.0,
                ..DefaultsConfig::default()
            },
            instructions: Vec::new(),
        };
        assert!(matches!(
            config.into_registry(),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // File loading
    // =========================================================================

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[defaults]\ncrop = true\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.defaults.crop);
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // stock_config_toml
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config, FactoryConfig::default());
    }

    #[test]
    fn stock_config_toml_documents_instructions() {
        let content = stock_config_toml();
        assert!(content.contains("[defaults]"));
        assert!(content.contains("# [[instructions]]"));
    }
}
