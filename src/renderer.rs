//! Master rendering and the profile-driven entry point.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::canvas::Canvas;
use crate::error::{IconError, Result};
use crate::export::{ExportReport, Exporter, ResampleFilter, resize_square};
use crate::icon::IconSizeSpec;
use crate::layer::{Layer, LayerPipeline, MaskConfig};
use crate::profile::{
    BackgroundSettings, DEFAULT_RESOLUTION, GlowSettings, IconProfile, MotifSettings, ShadowSettings,
};
use crate::svg::render_svg;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from an [`IconProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    ///
    /// On error nothing is changed.
    fn apply_profile(&mut self, profile: &IconProfile) -> Result<()>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> IconProfile;
}

// ============================================================================
// MasterSource
// ============================================================================

/// Where the base canvas of the master comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MasterSource {
    /// A transparent canvas; everything comes from the layers.
    #[default]
    Procedural,
    /// A square image file, resized to the authoring resolution if needed.
    Raster(PathBuf),
    /// SVG markup rasterized at the authoring resolution.
    Svg(String),
}

// ============================================================================
// IconRenderer
// ============================================================================

/// Renders one master and exports it at every requested size.
///
/// Configure layers directly through the [`pipeline`](Self::pipeline) field,
/// or all at once from an [`IconProfile`] with
/// [`apply_profile`](Configurable::apply_profile).
///
/// # Example
///
/// ```
/// use prism_icons::{Configurable, IconProfile, IconRenderer};
///
/// let mut renderer = IconRenderer::new(128);
/// renderer.apply_profile(&IconProfile::chat_bubble().with_resolution(128)).unwrap();
///
/// let master = renderer.render_master().unwrap();
/// assert_eq!(master.size(), 128);
/// assert_eq!(master.pixel(0, 0).unwrap().alpha, 0);
/// ```
#[derive(Debug, Clone)]
pub struct IconRenderer {
    /// Edge length of the square master, in pixels.
    pub resolution: u32,

    pub source: MasterSource,

    /// The layer pipeline. Access layers directly to configure them.
    pub pipeline: LayerPipeline,

    pub exporter: Exporter,

    /// Sizes written by [`run`](Self::run) and [`export`](Self::export).
    pub sizes: Vec<IconSizeSpec>,
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl IconRenderer {
    /// A procedural renderer with an empty pipeline.
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            source: MasterSource::Procedural,
            pipeline: LayerPipeline::default(),
            exporter: Exporter::default(),
            sizes: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: MasterSource) -> Self {
        self.source = source;
        self
    }

    /// Builds the base canvas from the configured source.
    pub fn base_canvas(&self) -> Result<Canvas> {
        match &self.source {
            MasterSource::Procedural => Ok(Canvas::new(self.resolution)),
            MasterSource::Raster(path) => self.load_raster(path),
            MasterSource::Svg(svg) => render_svg(svg, self.resolution),
        }
    }

    fn load_raster(&self, path: &Path) -> Result<Canvas> {
        if path.as_os_str().is_empty() {
            return Err(IconError::MissingSourceImage { path: None });
        }
        if !path.is_file() {
            return Err(IconError::MissingSourceImage {
                path: Some(path.to_path_buf()),
            });
        }

        let image = image::open(path)
            .map_err(|source| IconError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width != height {
            return Err(IconError::NonSquareSource { width, height });
        }
        if width == self.resolution {
            return Canvas::from_image(image);
        }

        debug!(
            "resizing source {} from {width}px to {}px",
            path.display(),
            self.resolution
        );
        let filter = if width > self.resolution {
            self.exporter.filter
        } else {
            ResampleFilter::Lanczos3
        };
        Canvas::from_image(resize_square(&image, self.resolution, filter))
    }

    /// Renders the master: base canvas, then every active layer.
    pub fn render_master(&self) -> Result<Canvas> {
        let master = self.pipeline.render(self.base_canvas()?)?;
        info!("rendered {0}x{0} master", master.size());
        Ok(master)
    }

    /// Exports an already rendered master at every configured size.
    pub fn export(&self, master: &Canvas, output_dir: &Path) -> Result<ExportReport> {
        self.exporter.export(master, &self.sizes, output_dir)
    }

    /// Renders the master and exports it.
    pub fn run(&self, output_dir: &Path) -> Result<ExportReport> {
        let master = self.render_master()?;
        self.export(&master, output_dir)
    }
}

impl Configurable for IconRenderer {
    /// Applies a profile's settings to this renderer.
    ///
    /// This sets the resolution, size list and filter, and the configuration
    /// and enabled state for each layer. The master source is left alone.
    fn apply_profile(&mut self, profile: &IconProfile) -> Result<()> {
        // Parse everything fallible before touching any layer.
        let background = profile
            .background
            .as_ref()
            .map(|settings| settings.to_gradient().map(|g| (g, settings.enabled)))
            .transpose()?;

        self.resolution = profile.resolution;
        self.sizes = profile.sizes.clone();
        self.exporter = Exporter::new(profile.filter);

        let pipeline = &mut self.pipeline;
        set_layer(&mut pipeline.background, background);
        set_layer(
            &mut pipeline.motif,
            profile
                .motif
                .as_ref()
                .map(|s| (s.to_layer(profile.resolution), s.enabled)),
        );
        set_layer(&mut pipeline.shadow, profile.shadow.map(|s| (s.into(), s.enabled)));
        set_layer(&mut pipeline.glow, profile.glow.map(|s| (s.into(), s.enabled)));
        set_layer(
            &mut pipeline.mask,
            profile.corner_radius_ratio.map(|r| (MaskConfig::new(r), true)),
        );
        Ok(())
    }

    /// Exports the current settings as a profile.
    ///
    /// Motifs are recorded by kind, so custom geometry set directly on a
    /// motif does not survive the round trip.
    fn export_profile(&self) -> IconProfile {
        let pipeline = &self.pipeline;

        let background = pipeline
            .background
            .config()
            .map(|g| BackgroundSettings::from_gradient(g, pipeline.background.is_enabled()));

        let motif = pipeline
            .motif
            .config()
            .map(|m| MotifSettings::from_layer(m, pipeline.motif.is_enabled()));

        let shadow = pipeline.shadow.config().map(|c| ShadowSettings {
            blur_radius: c.blur_radius,
            enabled: pipeline.shadow.is_enabled(),
        });

        let glow = pipeline.glow.config().map(|c| GlowSettings {
            steps: c.steps,
            spacing: c.spacing,
            enabled: pipeline.glow.is_enabled(),
        });

        IconProfile {
            resolution: self.resolution,
            background,
            motif,
            shadow,
            glow,
            corner_radius_ratio: pipeline.mask.active_config().map(|m| m.radius_ratio),
            sizes: self.sizes.clone(),
            filter: self.exporter.filter,
        }
    }
}

fn set_layer<C>(layer: &mut Layer<C>, settings: Option<(C, bool)>) {
    match settings {
        Some((config, enabled)) => {
            layer.set_config(Some(config));
            layer.set_enabled(enabled);
        }
        None => layer.set_config(None),
    }
}

// ============================================================================
// Tests
// ============================================================================
