//! Shared types passed between the caller, the orchestrator and the engine.
//!
//! Input images and output records serialize to and from JSON so the CLI can
//! read image manifests and emit batch results.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// One input image.
///
/// Only `path` is needed for processing. An image without a path is reported
/// in the batch messages and otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Restricts which instruction labels apply. `None` means all of them.
    /// Accepts a single string or an array in JSON.
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Vec<String>>,
    /// Explicit crop region override in `WxH+X+Y` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
}

impl SourceImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_crop(mut self, crop: &str) -> Self {
        self.crop = Some(crop.to_string());
        self
    }

    /// The source path, if present and non-empty.
    pub fn source_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Whether an instruction with `label` applies to this image.
    pub fn accepts_label(&self, label: &str) -> bool {
        self.labels
            .as_ref()
            .is_none_or(|labels| labels.iter().any(|l| l == label))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany<String>> = Option::deserialize(deserializer)?;
    Ok(value.map(Vec::from))
}

/// Parse an image manifest: a single image object or an array of them.
pub fn parse_images(json: &str) -> Result<Vec<SourceImage>, serde_json::Error> {
    let images: OneOrMany<SourceImage> = serde_json::from_str(json)?;
    Ok(images.into())
}

/// A generated derivative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivative {
    /// Instruction label that produced it.
    pub label: String,
    /// Path of the generated file.
    pub local: PathBuf,
    /// Path of the source image.
    pub original: PathBuf,
    /// Filename of the source image.
    pub name: String,
}

/// Aggregated result of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessOutput {
    /// Derivatives in processing order.
    pub derivatives: Vec<Derivative>,
    /// Explanations for derivatives that were not produced.
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_without_path_has_no_source() {
        assert_eq!(SourceImage::default().source_path(), None);
        assert_eq!(SourceImage::new("").source_path(), None);
        assert_eq!(
            SourceImage::new("a.jpg").source_path(),
            Some(Path::new("a.jpg"))
        );
    }

    #[test]
    fn unrestricted_image_accepts_every_label() {
        let image = SourceImage::new("a.jpg");
        assert!(image.accepts_label("main"));
        assert!(image.accepts_label("thumbnail"));
    }

    #[test]
    fn label_restriction_filters() {
        let image = SourceImage::new("a.jpg").with_labels(["thumbnail"]);
        assert!(image.accepts_label("thumbnail"));
        assert!(!image.accepts_label("main"));
    }

    #[test]
    fn empty_label_set_accepts_nothing() {
        let image = SourceImage::new("a.jpg").with_labels(Vec::<String>::new());
        assert!(!image.accepts_label("main"));
    }

    #[test]
    fn labels_accept_single_string() {
        let image: SourceImage =
            serde_json::from_str(r#"{"path": "./photos/kitty.jpg", "labels": "user"}"#).unwrap();
        assert_eq!(image.labels, Some(vec!["user".to_string()]));
    }

    #[test]
    fn labels_accept_array() {
        let image: SourceImage =
            serde_json::from_str(r#"{"path": "a.jpg", "labels": ["main", "thumb"]}"#).unwrap();
        assert_eq!(
            image.labels,
            Some(vec!["main".to_string(), "thumb".to_string()])
        );
    }

    #[test]
    fn unknown_fields_mean_missing_path() {
        let image: SourceImage = serde_json::from_str(r#"{"random": "./photos/kitty.jpg"}"#).unwrap();
        assert_eq!(image.source_path(), None);
        assert_eq!(image.labels, None);
    }

    #[test]
    fn parse_images_single_or_many() {
        let one = parse_images(r#"{"path": "a.jpg", "crop": "10x10+0+0"}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].crop.as_deref(), Some("10x10+0+0"));

        let many = parse_images(r#"[{"path": "a.jpg"}, {"path": "b.jpg"}]"#).unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].path, Some(PathBuf::from("b.jpg")));
    }

    #[test]
    fn derivative_serializes_to_json() {
        let derivative = Derivative {
            label: "main".to_string(),
            local: PathBuf::from("photos/kitty-main.jpg"),
            original: PathBuf::from("photos/kitty.jpg"),
            name: "kitty.jpg".to_string(),
        };
        let json = serde_json::to_value(&derivative).unwrap();
        assert_eq!(json["local"], "photos/kitty-main.jpg");
        assert_eq!(json["name"], "kitty.jpg");
    }
}
