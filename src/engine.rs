//! Sizing decision engine.
//!
//! Decides, for one source image and one instruction, which single action
//! produces the derivative, then performs it through an [`ImageBackend`].
//!
//! ## Decision order
//!
//! ```text
//! identify source ──► force == false and source smaller than box? ──► TooSmall (message)
//!                 │
//!                 ├─► crop == true ──► valid WxH+X+Y override? ──► CropRegion
//!                 │                                            └─► CropGravity
//!                 │
//!                 └─► source aspect > box aspect   (width binds)
//!                        source wider than box?   ──► ResizeToWidth  else Copy
//!                     otherwise                    (height binds, ties land here)
//!                        source taller than box?  ──► ResizeToHeight else Copy
//! ```
//!
//! [`plan`] is the pure decision; [`run`] identifies the source, plans and
//! executes. Backend failures propagate unchanged as [`ProcessError::Imaging`].

use crate::imaging::{
    CropParams, CropRegion, Dimensions, Gravity, ImageBackend, Quality, RegionCropParams,
    ResizeParams, UnknownGravity,
};
use crate::instructions::Instruction;
use crate::naming::split_source_path;
use crate::process::ProcessError;
use crate::types::Derivative;
use std::path::Path;
use tracing::debug;

/// The action chosen for one (image, instruction) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// `force` is off and the source is smaller than the box.
    TooSmall,
    /// Cut the caller-supplied region, then fit it into the box.
    CropRegion(CropRegion),
    /// Fill the box exactly, anchored at the instruction's gravity.
    CropGravity,
    /// Downscale so the width matches the box.
    ResizeToWidth,
    /// Downscale so the height matches the box.
    ResizeToHeight,
    /// Source already fits; copy it verbatim.
    Copy,
}

/// Result of a successfully handled pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created { derivative: Derivative, plan: Plan },
    Skipped(String),
}

/// Choose the action for `source` dimensions under `instruction`.
///
/// `crop_override` is the image's optional `WxH+X+Y` string; malformed values
/// and values with numbers beyond `u32` are ignored.
pub fn plan(source: Dimensions, instruction: &Instruction, crop_override: Option<&str>) -> Plan {
    if !instruction.force
        && (source.width < instruction.width || source.height < instruction.height)
    {
        return Plan::TooSmall;
    }

    if instruction.crop {
        return match crop_override.and_then(CropRegion::parse) {
            Some(region) => Plan::CropRegion(region),
            None => Plan::CropGravity,
        };
    }

    let desired_aspect = instruction.width as f64 / instruction.height as f64;
    let actual_aspect = source.width as f64 / source.height as f64;

    if actual_aspect > desired_aspect {
        if source.width > instruction.width {
            Plan::ResizeToWidth
        } else {
            Plan::Copy
        }
    } else if source.height > instruction.height {
        Plan::ResizeToHeight
    } else {
        Plan::Copy
    }
}

/// Produce the derivative of `source` for `instruction`, or explain why not.
pub fn run(
    backend: &impl ImageBackend,
    source: &Path,
    crop_override: Option<&str>,
    instruction: &Instruction,
) -> Result<Outcome, ProcessError> {
    let name = split_source_path(source);
    let output = name.derivative_path(&instruction.label);

    let dims = backend.identify(source)?;
    let plan = plan(dims, instruction, crop_override);
    debug!(
        source = %source.display(),
        label = %instruction.label,
        width = dims.width,
        height = dims.height,
        ?plan,
        "planned derivative"
    );

    let quality = Quality::from_fraction(instruction.quality);
    match plan {
        Plan::TooSmall => {
            return Ok(Outcome::Skipped(format!(
                "Image dimensions are too small, so {} image not created for {}",
                instruction.label, name.filename
            )));
        }
        Plan::CropRegion(region) => backend.crop_region(&RegionCropParams {
            source: source.to_path_buf(),
            output: output.clone(),
            region,
            width: instruction.width,
            height: instruction.height,
            quality,
        })?,
        Plan::CropGravity => {
            let gravity: Gravity = instruction
                .gravity
                .parse()
                .map_err(|UnknownGravity(name)| ProcessError::InvalidGravity(name))?;
            backend.crop(&CropParams {
                source: source.to_path_buf(),
                output: output.clone(),
                width: instruction.width,
                height: instruction.height,
                gravity,
                quality,
            })?
        }
        Plan::ResizeToWidth => backend.resize(&ResizeParams {
            source: source.to_path_buf(),
            output: output.clone(),
            width: Some(instruction.width),
            height: None,
            quality,
        })?,
        Plan::ResizeToHeight => backend.resize(&ResizeParams {
            source: source.to_path_buf(),
            output: output.clone(),
            width: None,
            height: Some(instruction.height),
            quality,
        })?,
        Plan::Copy => backend.copy(source, &output)?,
    }

    Ok(Outcome::Created {
        derivative: Derivative {
            label: instruction.label.clone(),
            local: output,
            original: source.to_path_buf(),
            name: name.filename,
        },
        plan,
    })
}
