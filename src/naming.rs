//! Output naming for derivatives.
//!
//! Every derivative is written next to its source, named after the source
//! stem plus the instruction label, with the extension preserved:
//!
//! - `photos/kitty.jpg` + `main` → `photos/kitty-main.jpg`
//! - `photos/archive.tar.png` + `thumb` → `photos/archive.tar-thumb.png`
//! - `photos/README` + `main` → `photos/README-main`
//!
//! Derivative paths are deterministic, so re-running a batch overwrites the
//! previous output instead of adding new files.

use std::path::{Path, PathBuf};

/// Components of a source path relevant to derivative naming.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceName {
    /// Directory holding the source (empty for a bare filename).
    pub dir: PathBuf,
    /// Final path component, e.g. `kitty.jpg`.
    pub filename: String,
    /// Filename without the last extension, e.g. `kitty`.
    pub stem: String,
    /// Last extension without the dot, e.g. `jpg`.
    pub extension: Option<String>,
}

/// Split a source path into directory, filename, stem and extension.
pub fn split_source_path(path: &Path) -> SourceName {
    let lossy = |s: &std::ffi::OsStr| s.to_string_lossy().into_owned();
    SourceName {
        dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        filename: path.file_name().map(lossy).unwrap_or_default(),
        stem: path.file_stem().map(lossy).unwrap_or_default(),
        extension: path.extension().map(lossy),
    }
}

impl SourceName {
    /// `<dir>/<stem>-<label>.<extension>`.
    pub fn derivative_path(&self, label: &str) -> PathBuf {
        let name = match &self.extension {
            Some(ext) => format!("{}-{}.{}", self.stem, label, ext),
            None => format!("{}-{}", self.stem, label),
        };
        self.dir.join(name)
    }
}
