//! The filter pipeline: one source image in, a fan of PNG artifacts out.
//!
//! ```text
//! input ──decode──▶ DynamicImage ──resize──▶ working raster (128×128)
//!                                                 │
//!        ┌─────────────┬──────────────┬───────────┴───────────┐
//!        ▼             ▼              ▼                       ▼
//!     O.png      O-gray.png  ...  O-sb.png      O-<name>.png × catalog entries
//! ```
//!
//! ## Ordering and failure
//!
//! Decode and resize come first; nothing is written if the source cannot be
//! decoded. Filters only read the working raster, so each batch (the
//! standard set, then the catalog colors) is rendered on the rayon pool. The
//! rendered images are then written one at a time in registry order, and the
//! first write error ends the run. The catalog is consulted once, after the
//! standard set has been written.
//!
//! A catalog entry with an unparseable code is skipped or aborts the run
//! according to [`MalformedPolicy`]. Under `abort` every code is checked
//! before any color artifact is written.
//!
//! ## Progress
//!
//! Callers may pass a channel sender; a [`PipelineEvent`] is sent as each step
//! completes. [`output`](crate::output) formats them for the terminal.

use crate::catalog::{ColorCatalog, ColorEntry};
use crate::config::{ConfigError, MalformedPolicy, PipelineConfig};
use crate::imaging::{
    BackendError, ColorParseError, Filter, FilterKind, ImageBackend, PngBackend, decode_hex,
    resize_to_target, standard_filters,
};
use crate::naming::{artifact_path, base_path, sanitize_suffix};
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid color code {code:?} for {name:?}: {source}")]
    Color {
        name: String,
        code: String,
        #[source]
        source: ColorParseError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<BackendError> for PipelineError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => Self::Io(e),
            BackendError::Decode { path, source } => Self::Decode { path, source },
            BackendError::Encode { path, source } => Self::Encode { path, source },
        }
    }
}

/// What to process and where to put it.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PathBuf,
    /// Output prefix `O`; artifacts are `O.png`, `O-<suffix>.png`.
    pub prefix: PathBuf,
}

/// Progress notifications, in the order the steps happen.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    SourceLoaded {
        path: String,
        width: u32,
        height: u32,
    },
    ArtifactWritten {
        label: String,
        path: String,
    },
    ColorSkipped {
        name: String,
        code: String,
        reason: String,
    },
}

/// One file the run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactRecord {
    /// `base`, a filter suffix, or a catalog name.
    pub label: String,
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// Hex code for named-color artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A catalog entry that produced no artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedColor {
    pub name: String,
    pub code: String,
    pub reason: String,
}

/// Everything a finished run did; serialized by `--manifest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub source: String,
    pub source_dimensions: (u32, u32),
    pub target_dimensions: (u32, u32),
    pub artifacts: Vec<ArtifactRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedColor>,
}

/// Run the pipeline with the PNG backend.
pub fn run(
    request: &PipelineRequest,
    config: &PipelineConfig,
    catalog: &impl ColorCatalog,
    events: Option<Sender<PipelineEvent>>,
) -> Result<RunReport, PipelineError> {
    run_with_backend(&PngBackend::new(), request, config, catalog, events)
}

/// Run the pipeline with a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    request: &PipelineRequest,
    config: &PipelineConfig,
    catalog: &impl ColorCatalog,
    events: Option<Sender<PipelineEvent>>,
) -> Result<RunReport, PipelineError> {
    let emit = |event: PipelineEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only loses progress output.
            let _ = tx.send(event);
        }
    };

    let source = backend.decode(&request.input)?;
    let source_dimensions = (source.width(), source.height());
    info!(
        path = %request.input.display(),
        width = source_dimensions.0,
        height = source_dimensions.1,
        "Source decoded"
    );
    emit(PipelineEvent::SourceLoaded {
        path: request.input.display().to_string(),
        width: source_dimensions.0,
        height: source_dimensions.1,
    });

    let raster = resize_to_target(&source, config.resize.target());
    drop(source);

    let mut artifacts = Vec::new();

    let base = DynamicImage::ImageRgba8(raster.clone());
    artifacts.push(write_artifact(
        backend,
        &base,
        "base",
        &base_path(&request.prefix),
        None,
        &emit,
    )?);

    let standard: Vec<Planned> = standard_filters(config.mosaic.params())
        .into_iter()
        .map(|filter| Planned { filter, code: None })
        .collect();
    artifacts.extend(render_and_write(
        backend,
        &raster,
        &standard,
        &request.prefix,
        &emit,
    )?);

    let (colors, skipped) = plan_colors(catalog.entries(), config.colors.on_malformed)?;
    for skip in &skipped {
        emit(PipelineEvent::ColorSkipped {
            name: skip.name.clone(),
            code: skip.code.clone(),
            reason: skip.reason.clone(),
        });
    }
    artifacts.extend(render_and_write(
        backend,
        &raster,
        &colors,
        &request.prefix,
        &emit,
    )?);

    info!(
        written = artifacts.len(),
        skipped = skipped.len(),
        "Pipeline complete"
    );

    Ok(RunReport {
        source: request.input.display().to_string(),
        source_dimensions,
        target_dimensions: raster.dimensions(),
        artifacts,
        skipped,
    })
}

/// A filter queued for rendering, with the catalog code it came from.
struct Planned {
    filter: Filter,
    code: Option<String>,
}

/// Turn catalog entries into blend filters, applying the malformed policy.
fn plan_colors(
    entries: Vec<ColorEntry>,
    policy: MalformedPolicy,
) -> Result<(Vec<Planned>, Vec<SkippedColor>), PipelineError> {
    let mut planned = Vec::new();
    let mut skipped = Vec::new();

    for entry in entries {
        let suffix = sanitize_suffix(&entry.name);
        if suffix.is_empty() {
            warn!(name = %entry.name, "Color name has no usable characters; skipping");
            skipped.push(SkippedColor {
                reason: "name has no usable characters".to_string(),
                name: entry.name,
                code: entry.code,
            });
            continue;
        }

        match decode_hex(&entry.code) {
            Ok(rgb) => planned.push(Planned {
                filter: Filter::new(suffix, FilterKind::Blend(rgb)),
                code: Some(entry.code),
            }),
            Err(source) if policy == MalformedPolicy::Skip => {
                warn!(name = %entry.name, code = %entry.code, error = %source, "Skipping malformed color code");
                skipped.push(SkippedColor {
                    reason: source.to_string(),
                    name: entry.name,
                    code: entry.code,
                });
            }
            Err(source) => {
                return Err(PipelineError::Color {
                    name: entry.name,
                    code: entry.code,
                    source,
                });
            }
        }
    }

    Ok((planned, skipped))
}

/// Render a batch in parallel, then write it sequentially in order.
fn render_and_write(
    backend: &impl ImageBackend,
    raster: &RgbaImage,
    batch: &[Planned],
    prefix: &Path,
    emit: &impl Fn(PipelineEvent),
) -> Result<Vec<ArtifactRecord>, PipelineError> {
    let rendered: Vec<DynamicImage> = batch
        .par_iter()
        .map(|planned| planned.filter.apply(raster))
        .collect();

    batch
        .iter()
        .zip(&rendered)
        .map(|(planned, image)| {
            let path = artifact_path(prefix, &planned.filter.name);
            write_artifact(
                backend,
                image,
                &planned.filter.name,
                &path,
                planned.code.clone(),
                emit,
            )
        })
        .collect()
}

fn write_artifact(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    label: &str,
    path: &Path,
    color: Option<String>,
    emit: &impl Fn(PipelineEvent),
) -> Result<ArtifactRecord, PipelineError> {
    backend.write(image, path)?;
    debug!(label, path = %path.display(), "Artifact written");
    emit(PipelineEvent::ArtifactWritten {
        label: label.to_string(),
        path: path.display().to_string(),
    });
    Ok(ArtifactRecord {
        label: label.to_string(),
        path: path.display().to_string(),
        width: image.width(),
        height: image.height(),
        color,
    })
}
