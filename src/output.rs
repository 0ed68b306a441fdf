//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Progress
//!
//! One header per batch, then one block per source image in input order.
//! Positions are 1-based; messages in the batch result keep 0-based indices.
//!
//! ```text
//! product (3 images, 2 instructions)
//!     001 kitty.jpg
//!         Source: photos/kitty.jpg
//!         main: resized
//!         thumbnail: cropped
//!     002 (no path)
//!         skipped
//! ```
//!
//! ## Summary
//!
//! ```text
//! Derivatives
//!     main → photos/kitty-main.jpg
//!     thumbnail → photos/kitty-thumbnail.jpg
//!
//! Messages
//!     Image dimensions are too small, so huge image not created for kitty.jpg
//!
//! Created 2 derivatives, 1 message
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::process::{ProcessEvent, VariantStatus};
use crate::types::ProcessOutput;
use std::path::Path;

/// Format a 0-based index as a 1-based, 3-digit zero-padded position.
fn format_index(index: usize) -> String {
    format!("{:0>3}", index + 1)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn status_label(status: VariantStatus) -> &'static str {
    match status {
        VariantStatus::Resized => "resized",
        VariantStatus::Cropped => "cropped",
        VariantStatus::Copied => "copied",
        VariantStatus::Skipped => "skipped (too small)",
    }
}

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            type_name,
            image_count,
            instruction_count,
        } => vec![format!(
            "{} ({}, {})",
            type_name,
            plural(*image_count, "image"),
            plural(*instruction_count, "instruction")
        )],
        ProcessEvent::ImageSkipped { index } => vec![
            format!("{}{} (no path)", indent(1), format_index(*index)),
            format!("{}skipped", indent(2)),
        ],
        ProcessEvent::ImageProcessed {
            index,
            source_path,
            variants,
        } => {
            let filename = Path::new(source_path)
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| source_path.clone());

            let mut lines = vec![
                format!("{}{} {}", indent(1), format_index(*index), filename),
                format!("{}Source: {}", indent(2), source_path),
            ];
            for variant in variants {
                lines.push(format!(
                    "{}{}: {}",
                    indent(2),
                    variant.label,
                    status_label(variant.status)
                ));
            }
            lines
        }
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Human-readable summary of a finished batch.
pub fn format_summary(output: &ProcessOutput) -> Vec<String> {
    let mut lines = Vec::new();

    if !output.derivatives.is_empty() {
        lines.push("Derivatives".to_string());
        for derivative in &output.derivatives {
            lines.push(format!(
                "{}{} → {}",
                indent(1),
                derivative.label,
                derivative.local.display()
            ));
        }
        lines.push(String::new());
    }

    if !output.messages.is_empty() {
        lines.push("Messages".to_string());
        for message in &output.messages {
            lines.push(format!("{}{}", indent(1), message));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Created {}, {}",
        plural(output.derivatives.len(), "derivative"),
        plural(output.messages.len(), "message")
    ));
    lines
}

pub fn print_summary(output: &ProcessOutput) {
    for line in format_summary(output) {
        println!("{}", line);
    }
}
