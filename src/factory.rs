//! The `ImageFactory` facade: an instruction registry bound to an image backend.
//!
//! ```no_run
//! use image_factory::{ImageFactory, InstructionSpec, SourceImage};
//!
//! let mut factory = ImageFactory::new();
//! factory.add([
//!     InstructionSpec::new("product", "thumbnail", 60, 40).crop(true),
//!     InstructionSpec::new("product", "main", 600, 400).quality(0.75),
//! ]);
//!
//! let output = factory.process("product", &[SourceImage::new("photos/kitty.jpg")])?;
//! for derivative in &output.derivatives {
//!     println!("{} → {}", derivative.label, derivative.local.display());
//! }
//! # Ok::<(), image_factory::ProcessError>(())
//! ```
//!
//! Processing takes `&self` and the backend is `Sync`, so independent batches
//! may run from several threads against one factory. Registration needs
//! `&mut self` and therefore cannot overlap with processing.

use crate::imaging::{ImageBackend, RustBackend};
use crate::instructions::{InstructionDefaults, InstructionRegistry, InstructionSpec};
use crate::process::{ProcessError, ProcessEvent, process_with_backend};
use crate::types::{ProcessOutput, SourceImage};
use serde_json::Value;
use std::sync::mpsc::Sender;

/// Crate version reported by [`ImageFactory::VERSION`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default)]
pub struct ImageFactory<B: ImageBackend = RustBackend> {
    backend: B,
    registry: InstructionRegistry,
}

impl ImageFactory<RustBackend> {
    pub const VERSION: &'static str = VERSION;

    /// Factory with the pure-Rust backend and no instructions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with the pure-Rust backend, pre-loaded with `specs`.
    pub fn with_instructions<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = InstructionSpec>,
    {
        let mut factory = Self::new();
        factory.add(specs);
        factory
    }
}

impl<B: ImageBackend> ImageFactory<B> {
    pub fn with_backend(backend: B) -> Self {
        Self::with_registry(backend, InstructionRegistry::new())
    }

    pub fn with_registry(backend: B, registry: InstructionRegistry) -> Self {
        Self { backend, registry }
    }

    /// Empty factory whose instructions fall back to `defaults`.
    pub fn with_defaults(backend: B, defaults: InstructionDefaults) -> Self {
        Self::with_registry(backend, InstructionRegistry::with_defaults(defaults))
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Register instruction specs. Invalid specs are dropped; returns how many
    /// were accepted.
    pub fn add<I>(&mut self, specs: I) -> usize
    where
        I: IntoIterator<Item = InstructionSpec>,
    {
        self.registry.add(specs)
    }

    /// Register loosely typed instructions (one JSON object or an array).
    pub fn add_value(&mut self, value: &Value) -> usize {
        self.registry.add_value(value)
    }

    /// Total number of instructions accepted so far.
    pub fn count(&self) -> usize {
        self.registry.count()
    }

    pub fn instructions(&self) -> &InstructionRegistry {
        &self.registry
    }

    /// Generate every derivative of `type_name` for `images`.
    pub fn process(
        &self,
        type_name: &str,
        images: &[SourceImage],
    ) -> Result<ProcessOutput, ProcessError> {
        process_with_backend(&self.backend, &self.registry, type_name, images, None)
    }

    pub fn process_one(
        &self,
        type_name: &str,
        image: &SourceImage,
    ) -> Result<ProcessOutput, ProcessError> {
        self.process(type_name, std::slice::from_ref(image))
    }

    /// Like [`process`](Self::process), sending [`ProcessEvent`]s to `progress`
    /// as images complete.
    pub fn process_with_progress(
        &self,
        type_name: &str,
        images: &[SourceImage],
        progress: Sender<ProcessEvent>,
    ) -> Result<ProcessOutput, ProcessError> {
        process_with_backend(
            &self.backend,
            &self.registry,
            type_name,
            images,
            Some(progress),
        )
    }

    /// Completion-callback form of [`process`](Self::process).
    ///
    /// The callback runs exactly once with the batch result. Without a
    /// callback nothing is processed.
    pub fn process_with_callback<F>(
        &self,
        type_name: &str,
        images: &[SourceImage],
        callback: Option<F>,
    ) where
        F: FnOnce(Result<ProcessOutput, ProcessError>),
    {
        let Some(callback) = callback else {
            return;
        };
        callback(self.process(type_name, images));
    }
}
