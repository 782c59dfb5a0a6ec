//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Measure
//!
//! ```text
//! Source:    200x100 (landscape)
//! Bounds:    50x50
//! Fit:       50x25
//! Fill:      100x50
//! Crop:      50x50+25+0
//! ```
//!
//! ## Batch
//!
//! ```text
//! Processing 2 images
//! 001 dawn.jpg
//!     4032x3024 → 400x500
//!     Output: thumbs/dawn.jpg
//! 002 broken.png
//!     Failed: Processing failed: ...
//! ```

use crate::batch::{BatchEvent, BatchSummary};
use crate::imaging::{Dimensions, Measurement, Size};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn orientation(landscape: bool) -> &'static str {
    if landscape { "landscape" } else { "portrait/square" }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn format_measurement(m: &Measurement) -> Vec<String> {
    vec![
        format!("Source:    {} ({})", m.source, orientation(m.landscape)),
        format!("Bounds:    {}", m.bounds),
        format!("Fit:       {}", m.fit),
        format!("Fill:      {}", m.fill),
        format!("Crop:      {}", m.crop),
    ]
}

pub fn format_identify(path: &Path, dims: Dimensions) -> String {
    let landscape = Size::from(dims).is_landscape();
    format!("{}: {} ({})", path.display(), dims, orientation(landscape))
}

/// One line confirming a written file.
pub fn format_written(path: &Path, dims: Dimensions) -> String {
    format!("Wrote {} ({})", path.display(), dims)
}

pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => vec![format!("Processing {} images", total)],
        BatchEvent::ImageProcessed {
            index,
            source,
            output,
            source_dims,
            output_dims,
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("    {} → {}", source_dims, output_dims),
            format!("    Output: {}", output.display()),
        ],
        BatchEvent::ImageFailed {
            index,
            source,
            error,
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("    Failed: {}", error),
        ],
    }
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!("Batch complete: {}", summary)
}

pub fn print_measurement(m: &Measurement) {
    for line in format_measurement(m) {
        println!("{}", line);
    }
}

pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}
