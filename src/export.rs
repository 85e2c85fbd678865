//! Multi-resolution export of a finished master.
//!
//! One master canvas is resampled into every requested [`IconSizeSpec`] and
//! written as PNG. Batch-level problems (duplicate filenames) reject the
//! whole batch before anything touches the disk; per-spec problems (bad
//! sizes, names outside the output directory, I/O failures) are logged and
//! reported while the remaining specs are still written.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, premultiply, unpremultiply};
use crate::error::{IconError, Result};
use crate::icon::{IconSizeSpec, Manifest, ManifestEntry};

// ============================================================================
// ResampleFilter
// ============================================================================

/// Downscaling filter. Nearest-neighbour is deliberately not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ResampleFilter {
    /// Box averaging over each destination pixel's footprint.
    #[default]
    Area,
    /// Windowed sinc with three lobes; sharpest, may ring.
    Lanczos3,
    /// Cubic convolution.
    CatmullRom,
}

impl ResampleFilter {
    fn resize(self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        match self {
            Self::Area => imageops::thumbnail(image, width, height),
            Self::Lanczos3 => imageops::resize(image, width, height, FilterType::Lanczos3),
            Self::CatmullRom => imageops::resize(image, width, height, FilterType::CatmullRom),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// A spec that could not be exported.
#[derive(Debug)]
pub struct ExportFailure {
    pub filename: String,
    pub error: IconError,
}

/// Outcome of an export batch.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// One entry per written file, in spec order.
    pub manifest: Manifest,
    /// One record per skipped spec, in spec order.
    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    /// True if every spec was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Resamples a master canvas into a catalog of sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exporter {
    pub filter: ResampleFilter,
}

impl Exporter {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    /// Resamples `master` to `width x height`.
    ///
    /// A target equal to the master size returns an exact copy. Larger
    /// targets and zero sizes are rejected with the spec's filename attached.
    pub fn resample(&self, master: &Canvas, spec: &IconSizeSpec) -> Result<RgbaImage> {
        check_size(master.size(), spec)?;
        Ok(self.resample_unchecked(master, &premultiplied(master.image()), spec))
    }

    fn resample_unchecked(&self, master: &Canvas, premultiplied: &RgbaImage, spec: &IconSizeSpec) -> RgbaImage {
        if spec.width == master.size() && spec.height == master.size() {
            return master.image().clone();
        }
        unpremultiplied(self.filter.resize(premultiplied, spec.width, spec.height))
    }

    /// Writes every spec in `specs` under `output_dir`.
    ///
    /// Returns `Err` only for batch-level problems, in which case nothing is
    /// written. Per-spec failures are collected in the report.
    pub fn export(&self, master: &Canvas, specs: &[IconSizeSpec], output_dir: &Path) -> Result<ExportReport> {
        check_unique(specs)?;

        let premultiplied = premultiplied(master.image());
        let results: Vec<(&IconSizeSpec, Result<ManifestEntry>)> = specs
            .par_iter()
            .map(|spec| (spec, self.export_one(master, &premultiplied, spec, output_dir)))
            .collect();

        let mut report = ExportReport::default();
        for (spec, result) in results {
            match result {
                Ok(entry) => report.manifest.push(entry),
                Err(error) => {
                    warn!("skipping {}: {error}", spec.filename);
                    report.failures.push(ExportFailure {
                        filename: spec.filename.clone(),
                        error,
                    });
                }
            }
        }

        if report.is_complete() {
            info!("exported {} icons to {}", report.manifest.len(), output_dir.display());
        } else {
            warn!(
                "exported {} icons to {}, {} failed",
                report.manifest.len(),
                output_dir.display(),
                report.failures.len()
            );
        }
        Ok(report)
    }

    fn export_one(
        &self,
        master: &Canvas,
        premultiplied: &RgbaImage,
        spec: &IconSizeSpec,
        output_dir: &Path,
    ) -> Result<ManifestEntry> {
        check_size(master.size(), spec)?;

        let relative = output_name(&spec.filename)?;
        let path = output_dir.join(&relative);
        let dir = path.parent().unwrap_or(output_dir);
        fs::create_dir_all(dir).map_err(|source| IconError::Io {
            path: path.clone(),
            source,
        })?;

        let image = self.resample_unchecked(master, premultiplied, spec);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| IconError::Image {
                path: path.clone(),
                source,
            })?;

        info!("wrote {} ({}x{})", path.display(), spec.width, spec.height);
        Ok(ManifestEntry {
            filename: relative,
            ..ManifestEntry::from_spec(spec)
        })
    }
}

/// Normalizes an export filename to a `/`-separated path relative to the
/// output directory. `.` segments are dropped; absolute paths and `..`
/// segments are rejected.
fn output_name(filename: &str) -> Result<String> {
    let invalid = |reason: &str| IconError::InvalidFilename {
        filename: filename.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = Vec::new();
    for component in Path::new(filename).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("`..` leaves the output directory")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("path is absolute")),
        }
    }
    if parts.is_empty() {
        return Err(invalid("no file name"));
    }
    Ok(parts.join("/"))
}

/// Rejects a batch where two specs resolve to the same file. Names that do
/// not resolve at all are left to fail on their own.
fn check_unique(specs: &[IconSizeSpec]) -> Result<()> {
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        let Ok(name) = output_name(&spec.filename) else {
            continue;
        };
        if !seen.insert(name) {
            return Err(IconError::DuplicateFilename(spec.filename.clone()));
        }
    }
    Ok(())
}

fn check_size(master: u32, spec: &IconSizeSpec) -> Result<()> {
    if spec.width == 0 || spec.height == 0 {
        return Err(IconError::InvalidSize {
            filename: spec.filename.clone(),
            width: spec.width,
            height: spec.height,
        });
    }
    if spec.width > master || spec.height > master {
        return Err(IconError::UnsupportedUpscale {
            filename: spec.filename.clone(),
            width: spec.width,
            height: spec.height,
            master,
        });
    }
    Ok(())
}

/// Resizes a straight-alpha image to `size x size`, filtering in
/// premultiplied space. Used for raster sources that do not match the
/// authoring resolution.
pub(crate) fn resize_square(image: &RgbaImage, size: u32, filter: ResampleFilter) -> RgbaImage {
    unpremultiplied(filter.resize(&premultiplied(image), size, size))
}

fn premultiplied(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        px.0 = premultiply(px[0], px[1], px[2], px[3]);
    }
    out
}

fn unpremultiplied(mut image: RgbaImage) -> RgbaImage {
    for px in image.pixels_mut() {
        px.0 = unpremultiply(px[0], px[1], px[2], px[3]);
    }
    image
}
