//! Batch pipeline orchestration.
//!
//! Runs every instruction registered for an image type against a list of
//! source images and gathers the derivatives and messages.
//!
//! ## Traversal
//!
//! Images are visited in input order; for each image, the type's instructions
//! run in registration order. [`BatchSteps`] turns that double loop into a
//! flat sequence of [`Step`]s:
//!
//! ```text
//! image 0 ─ main ─ thumbnail ─ done
//! image 1 (no path) ─ missing
//! image 2 (labels = [thumbnail]) ─ thumbnail ─ done
//! ```
//!
//! Each pair completes before the next one starts. There is no parallelism
//! inside a batch.
//!
//! ## Failure semantics
//!
//! | Situation | Result |
//! |---|---|
//! | Unknown type | `Err(InvalidType)`, nothing runs |
//! | Image without a path | message, next image |
//! | Label not in the image's `labels` | silently skipped |
//! | Source smaller than box with `force = false` | message, next instruction |
//! | Any identify/resize/crop/copy failure | `Err`, batch stops, partial output dropped |

use crate::engine::{self, Outcome, Plan};
use crate::imaging::{BackendError, ImageBackend};
use crate::instructions::{Instruction, InstructionRegistry};
use crate::types::{ProcessOutput, SourceImage};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("invalid image type: {0}")]
    InvalidType(String),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Unknown crop gravity: {0}")]
    InvalidGravity(String),
}

/// How a single variant of an image was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Resized,
    Cropped,
    Copied,
    Skipped,
}

impl From<Plan> for VariantStatus {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::TooSmall => VariantStatus::Skipped,
            Plan::CropRegion(_) | Plan::CropGravity => VariantStatus::Cropped,
            Plan::ResizeToWidth | Plan::ResizeToHeight => VariantStatus::Resized,
            Plan::Copy => VariantStatus::Copied,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantInfo {
    pub label: String,
    pub status: VariantStatus,
}

/// Progress events sent while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    BatchStarted {
        type_name: String,
        image_count: usize,
        instruction_count: usize,
    },
    /// Image at `index` has no path and was not processed.
    ImageSkipped { index: usize },
    /// All instructions for the image at `index` have completed.
    ImageProcessed {
        index: usize,
        source_path: String,
        variants: Vec<VariantInfo>,
    },
}

/// One unit of work in a batch.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    /// The image has no usable path.
    MissingPath { index: usize },
    /// Run `instruction` against `image`.
    Pair {
        index: usize,
        source: &'a Path,
        image: &'a SourceImage,
        instruction: &'a Instruction,
    },
    /// Every applicable instruction for the image has been yielded.
    ImageDone { index: usize, source: &'a Path },
}

/// Sequential images × instructions traversal with label filtering applied.
#[derive(Debug, Clone)]
pub struct BatchSteps<'a> {
    images: &'a [SourceImage],
    instructions: &'a [Instruction],
    image: usize,
    instruction: usize,
}

impl<'a> BatchSteps<'a> {
    pub fn new(images: &'a [SourceImage], instructions: &'a [Instruction]) -> Self {
        Self {
            images,
            instructions,
            image: 0,
            instruction: 0,
        }
    }
}

impl<'a> Iterator for BatchSteps<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Step<'a>> {
        loop {
            let index = self.image;
            let image = self.images.get(index)?;

            let Some(source) = image.source_path() else {
                self.image += 1;
                return Some(Step::MissingPath { index });
            };

            let Some(instruction) = self.instructions.get(self.instruction) else {
                self.image += 1;
                self.instruction = 0;
                return Some(Step::ImageDone { index, source });
            };
            self.instruction += 1;

            if image.accepts_label(&instruction.label) {
                return Some(Step::Pair {
                    index,
                    source,
                    image,
                    instruction,
                });
            }
        }
    }
}

fn emit(progress: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is listening
        tx.send(event).ok();
    }
}

/// Process `images` with the instructions registered for `type_name`.
///
/// Returns all derivatives and messages once every pair has been attempted,
/// or the first hard error.
pub fn process_with_backend(
    backend: &impl ImageBackend,
    registry: &InstructionRegistry,
    type_name: &str,
    images: &[SourceImage],
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessOutput, ProcessError> {
    let instructions = registry
        .get(type_name)
        .ok_or_else(|| ProcessError::InvalidType(type_name.to_string()))?;

    debug!(
        type_name,
        images = images.len(),
        instructions = instructions.len(),
        "starting batch"
    );
    emit(
        &progress,
        ProcessEvent::BatchStarted {
            type_name: type_name.to_string(),
            image_count: images.len(),
            instruction_count: instructions.len(),
        },
    );

    let mut output = ProcessOutput::default();
    let mut variants = Vec::new();

    for step in BatchSteps::new(images, instructions) {
        match step {
            Step::MissingPath { index } => {
                output.messages.push(format!(
                    "Image at index {} has no path specified, so it was not processed.",
                    index
                ));
                emit(&progress, ProcessEvent::ImageSkipped { index });
            }
            Step::Pair {
                source,
                image,
                instruction,
                ..
            } => match engine::run(backend, source, image.crop.as_deref(), instruction)? {
                Outcome::Created { derivative, plan } => {
                    variants.push(VariantInfo {
                        label: instruction.label.clone(),
                        status: plan.into(),
                    });
                    output.derivatives.push(derivative);
                }
                Outcome::Skipped(message) => {
                    variants.push(VariantInfo {
                        label: instruction.label.clone(),
                        status: VariantStatus::Skipped,
                    });
                    output.messages.push(message);
                }
            },
            Step::ImageDone { index, source } => emit(
                &progress,
                ProcessEvent::ImageProcessed {
                    index,
                    source_path: source.display().to_string(),
                    variants: std::mem::take(&mut variants),
                },
            ),
        }
    }

    debug!(
        derivatives = output.derivatives.len(),
        messages = output.messages.len(),
        "batch complete"
    );
    Ok(output)
}
