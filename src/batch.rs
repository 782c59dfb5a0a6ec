//! Directory batch processing.
//!
//! Walks a source directory, and for every image with a compiled-in decoder
//! writes a resized copy into the output directory, mirroring the source
//! layout:
//!
//! ```text
//! photos/                     thumbs/
//! ├── 001-dawn.jpg      →     ├── 001-dawn.jpg      (400x500, center-cropped)
//! └── travel/                 └── travel/
//!     └── rome.png      →         └── rome.png
//! ```
//!
//! [`BatchMode::CropToFit`] produces exact-size thumbnails via
//! [`resize_and_crop_to_fit`]; [`BatchMode::Fit`] shrinks each image into the
//! box via [`resize_to_fit`] and keeps its aspect ratio.
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon). A
//! failing image is reported as a [`BatchEvent::ImageFailed`] and does not stop
//! the rest of the batch.

use crate::imaging::{
    BackendError, Dimensions, ImageBackend, Interpolation, Quality, RustBackend, Size,
    resize_and_crop_to_fit, resize_to_fit, rust_backend,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Output {} is already produced from {}", output.display(), first.display())]
    OutputCollision { output: PathBuf, first: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Cover the box, then center-crop to it exactly.
    CropToFit,
    /// Shrink or grow into the box, keeping the aspect ratio.
    Fit,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub size: Dimensions,
    pub mode: BatchMode,
    pub interpolation: Interpolation,
    pub quality: Quality,
    /// Output extension (e.g. `"webp"`). `None` keeps each source's extension.
    pub output_extension: Option<String>,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    ImageProcessed {
        index: usize,
        source: PathBuf,
        output: PathBuf,
        source_dims: Dimensions,
        output_dims: Dimensions,
    },
    ImageFailed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} failed", self.processed, self.failed)
    }
}

/// All decodable images under `dir`, sorted by path.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::SourceNotFound(dir.to_path_buf()));
    }
    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && rust_backend::is_supported_input(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Where the processed copy of `source` goes: same relative path under
/// `output_dir`, optionally with a new extension.
pub fn output_path_for(
    source: &Path,
    source_root: &Path,
    output_dir: &Path,
    extension: Option<&str>,
) -> PathBuf {
    let relative = source.strip_prefix(source_root).unwrap_or(source);
    let relative = match relative.file_name() {
        Some(name) if relative.is_absolute() => Path::new(name),
        _ => relative,
    };
    let out = output_dir.join(relative);
    match extension {
        Some(ext) => out.with_extension(ext),
        None => out,
    }
}

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq)]
struct Job {
    source: PathBuf,
    output: PathBuf,
    /// Earlier source that already claimed `output`.
    claimed_by: Option<PathBuf>,
}

/// Map every source to its output path. When two sources map to the same
/// output (e.g. `dawn.jpg` and `dawn.png` with a forced extension), the first
/// in sorted order keeps it and the later ones are marked as collisions.
fn plan_jobs(
    sources: &[PathBuf],
    source_root: &Path,
    output_dir: &Path,
    extension: Option<&str>,
) -> Vec<Job> {
    let mut claims: HashMap<PathBuf, PathBuf> = HashMap::new();
    sources
        .iter()
        .map(|source| {
            let output = output_path_for(source, source_root, output_dir, extension);
            let claimed_by = match claims.get(&output) {
                Some(first) => Some(first.clone()),
                None => {
                    claims.insert(output.clone(), source.clone());
                    None
                }
            };
            Job {
                source: source.clone(),
                output,
                claimed_by,
            }
        })
        .collect()
}

/// Process every image under `source_dir` into `output_dir`.
///
/// Progress events go to `events` when given. Only setup failures (missing
/// source directory, unreadable tree) are returned as errors. A source whose
/// output path collides with an earlier one is reported as failed and not
/// written.
pub fn run_batch(
    source_dir: &Path,
    output_dir: &Path,
    config: &BatchConfig,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchSummary, BatchError> {
    let sources = collect_sources(source_dir)?;
    info!(
        total = sources.len(),
        source = %source_dir.display(),
        "Starting batch"
    );
    emit(&events, BatchEvent::Started {
        total: sources.len(),
    });
    std::fs::create_dir_all(output_dir)?;

    let jobs = plan_jobs(
        &sources,
        source_dir,
        output_dir,
        config.output_extension.as_deref(),
    );
    let backend = RustBackend::new();
    let outcomes: Vec<bool> = jobs
        .par_iter()
        .enumerate()
        .map(|(i, job)| {
            let source = &job.source;
            let result = match &job.claimed_by {
                Some(first) => Err(BatchError::OutputCollision {
                    output: job.output.clone(),
                    first: first.clone(),
                }),
                None => process_one(&backend, source, &job.output, config),
            };
            match result {
                Ok((source_dims, output_dims)) => {
                    emit(&events, BatchEvent::ImageProcessed {
                        index: i + 1,
                        source: source.clone(),
                        output: job.output.clone(),
                        source_dims,
                        output_dims,
                    });
                    true
                }
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "Image failed");
                    emit(&events, BatchEvent::ImageFailed {
                        index: i + 1,
                        source: source.clone(),
                        error: e.to_string(),
                    });
                    false
                }
            }
        })
        .collect();

    let processed = outcomes.iter().filter(|ok| **ok).count();
    let summary = BatchSummary {
        processed,
        failed: outcomes.len() - processed,
    };
    info!(%summary, "Batch complete");
    Ok(summary)
}

fn emit(events: &Option<Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        // The receiver going away only loses progress output
        let _ = tx.send(event);
    }
}

fn process_one(
    backend: &RustBackend,
    source: &Path,
    output: &Path,
    config: &BatchConfig,
) -> Result<(Dimensions, Dimensions), BatchError> {
    let img = rust_backend::load_image(source)?;
    let target = Size::from(config.size);
    let result = match config.mode {
        BatchMode::CropToFit => {
            resize_and_crop_to_fit(backend, &img, target, config.interpolation)?
        }
        BatchMode::Fit => resize_to_fit(backend, &img, target, config.interpolation)?,
    };
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    rust_backend::save_image(&result, output, config.quality)?;
    Ok((backend.dimensions(&img), backend.dimensions(&result)))
}
