//! Error type shared by every stage of icon synthesis and export.

use std::path::PathBuf;

use thiserror::Error;

use crate::shape::Point;

/// Result alias used throughout the crate.
pub type Result<T, E = IconError> = std::result::Result<T, E>;

/// Errors produced while drawing, compositing, or exporting icons.
///
/// Geometry errors carry the motif name and the computed vertices so a bad
/// recipe can be diagnosed from the message alone. Export errors carry the
/// filename or path of the entry that failed.
#[derive(Debug, Error)]
pub enum IconError {
    /// A shape could not be drawn (too few points, zero scale, non-finite
    /// coordinates). Fatal to the motif being drawn.
    #[error("invalid geometry in {motif}: {reason} (vertices: {vertices:?})")]
    InvalidGeometry {
        motif: String,
        reason: String,
        vertices: Vec<Point>,
    },

    /// An export target is larger than the master image.
    #[error("{filename}: requested {width}x{height} exceeds master resolution {master}x{master}")]
    UnsupportedUpscale {
        filename: String,
        width: u32,
        height: u32,
        master: u32,
    },

    /// An export target has a zero dimension.
    #[error("{filename}: invalid target size {width}x{height}")]
    InvalidSize {
        filename: String,
        width: u32,
        height: u32,
    },

    /// An export filename is absolute, climbs out of the output directory
    /// with `..`, or names no file at all.
    #[error("{filename}: invalid output filename ({reason})")]
    InvalidFilename { filename: String, reason: String },

    /// Two specs in one export batch resolve to the same file.
    #[error("duplicate filename {0:?} in export batch")]
    DuplicateFilename(String),

    /// Filesystem failure. During export `path` is the file being written,
    /// even when creating its parent directory is what failed.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding or encoding failure.
    #[error("image error at {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Source-image mode was requested but no image is available.
    #[error("source image missing{}", path.as_ref().map(|p| format!(": {}", p.display())).unwrap_or_default())]
    MissingSourceImage { path: Option<PathBuf> },

    /// Master images must be square.
    #[error("source image is {width}x{height}; master images must be square")]
    NonSquareSource { width: u32, height: u32 },

    /// SVG markup could not be parsed or rendered.
    #[error("failed to render SVG source: {0}")]
    Svg(String),

    /// Two canvases that must share a size do not.
    #[error("canvas size mismatch: expected {expected}x{expected}, got {actual}x{actual}")]
    SizeMismatch { expected: u32, actual: u32 },

    /// A color string in a profile could not be parsed.
    #[error("invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },

    /// A profile could not be (de)serialized.
    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),
}

impl IconError {
    /// Builds an [`IconError::InvalidGeometry`] for the named motif.
    pub fn geometry(motif: impl Into<String>, reason: impl Into<String>, vertices: &[Point]) -> Self {
        Self::InvalidGeometry {
            motif: motif.into(),
            reason: reason.into(),
            vertices: vertices.to_vec(),
        }
    }

    /// Returns the export filename this error refers to, if any.
    ///
    /// Size and name errors return the filename as declared. `Io` and
    /// `Image` errors only know the path, so they return its last component.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::UnsupportedUpscale { filename, .. }
            | Self::InvalidSize { filename, .. }
            | Self::InvalidFilename { filename, .. } => Some(filename),
            Self::DuplicateFilename(filename) => Some(filename),
            Self::Io { path, .. } | Self::Image { path, .. } => {
                path.file_name().and_then(|name| name.to_str())
            }
            _ => None,
        }
    }
}
