//! # Image Factory
//!
//! Generates named derivatives (thumbnails, main images, avatars, …) from a
//! catalog of source images according to reusable, type-scoped instruction
//! sets.
//!
//! # Architecture: Registry, Engine, Pipeline
//!
//! ```text
//! instructions ──► InstructionRegistry        (validate, normalize, group by type)
//!                          │
//! images ──► process ──► engine ──► ImageBackend  (identify, resize, crop, copy)
//!                │
//!                └─► ProcessOutput { derivatives, messages }
//! ```
//!
//! - The **registry** stores instructions by image type in registration order.
//! - The **engine** makes one sizing decision per (image, instruction) pair:
//!   skip as too small, crop to a region, crop at a gravity, resize to width,
//!   resize to height, or copy unchanged.
//! - The **pipeline** walks images × instructions sequentially, applies each
//!   image's label filter, collects messages, and stops at the first hard
//!   failure.
//!
//! Pixel work sits behind [`imaging::ImageBackend`] so the decision logic can
//! be tested with a recording mock and no image files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`factory`] | `ImageFactory` facade: registration and processing entry points |
//! | [`instructions`] | Instruction specs, validation, defaults and the registry |
//! | [`engine`] | The per-pair sizing decision and its execution |
//! | [`process`] | Batch orchestration, progress events, `ProcessError` |
//! | [`naming`] | Derivative output paths `<stem>-<label>.<ext>` |
//! | [`imaging`] | Backend trait, pure-Rust backend, dimension math |
//! | [`types`] | Source images and batch results, JSON-serializable |
//! | [`config`] | `factory.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Derivatives Live Next to Their Source
//!
//! Output paths are derived only from the source path and the instruction
//! label. Re-running a batch overwrites the same files, and no output
//! directory needs configuring.
//!
//! ## Soft Skips vs Hard Failures
//!
//! Expected gaps (no path, label not requested, source too small) become
//! messages in the result. Anything the backend cannot do aborts the batch
//! and returns the error alone; partial output is discarded.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) for
//! every operation, so the binary needs no ImageMagick or other system
//! libraries.

pub mod config;
pub mod engine;
pub mod factory;
pub mod imaging;
pub mod instructions;
pub mod naming;
pub mod output;
pub mod process;
pub mod types;

pub use factory::{ImageFactory, VERSION};
pub use instructions::{Instruction, InstructionDefaults, InstructionRegistry, InstructionSpec};
pub use process::{ProcessError, ProcessEvent};
pub use types::{Derivative, ProcessOutput, SourceImage};

#[cfg(test)]
pub(crate) mod test_helpers;
