//! prism-icons: procedural application icon synthesis and export
//!
//! This crate draws a square master icon from a gradient background, a
//! vector motif (prism, chat bubble or neural network), soft shadow and glow
//! effects and a rounded-corner mask, then resamples the master into every
//! size an app icon catalog needs.
//!
//! # Example
//!
//! ```
//! use prism_icons::{
//!     Gradient, IconRenderer, IconSizeSpec, Layer, MaskConfig, PrismMotif, rgba,
//! };
//!
//! let mut renderer = IconRenderer::new(256);
//!
//! // Configure layers directly through the pipeline
//! renderer.pipeline.background = Layer::with_config(Gradient::radial(
//!     rgba(120, 80, 200, 255),
//!     rgba(80, 50, 150, 255),
//! ));
//! renderer.pipeline.motif = Layer::with_config(PrismMotif::classic(256).into());
//! renderer.pipeline.mask = Layer::with_config(MaskConfig::default());
//!
//! // Toggle layers without losing config
//! renderer.pipeline.mask.set_enabled(false);
//! renderer.pipeline.mask.set_enabled(true);
//!
//! renderer.sizes = vec![
//!     IconSizeSpec::square(32, "icon-32.png"),
//!     IconSizeSpec::square(256, "icon-256.png"),
//! ];
//!
//! let dir = std::env::temp_dir().join("prism-icons-doc");
//! let report = renderer.run(&dir).unwrap();
//! assert!(report.is_complete());
//! assert_eq!(report.manifest.len(), 2);
//! ```
//!
//! # Serializable Profiles
//!
//! Whole recipes travel as [`IconProfile`] JSON and are applied with the
//! [`Configurable`] trait:
//!
//! ```
//! use prism_icons::{Configurable, IconProfile, IconRenderer};
//!
//! let mut renderer = IconRenderer::default();
//! renderer.apply_profile(&IconProfile::alternate_prism()).unwrap();
//!
//! // Export current settings
//! let exported = renderer.export_profile();
//! let json = exported.to_json_pretty().unwrap();
//! assert!(json.contains("prism-alternate"));
//! ```

mod canvas;
pub mod catalog;
mod effects;
mod error;
mod export;
mod icon;
pub mod layer;
mod profile;
mod renderer;
mod shape;
mod svg;

pub use canvas::{BlendMode, Canvas, Color, rgba, white};
pub use effects::{gaussian_blur, gaussian_kernel};
pub use error::{IconError, Result};
pub use export::{ExportFailure, ExportReport, Exporter, ResampleFilter};
pub use icon::{IconSizeSpec, Idiom, Manifest, ManifestEntry, Platform, SizePx};
pub use layer::motif::{
    ChatBubbleMotif, FaceAlphas, NeuralNetworkMotif, PrismMotif, PrismPart, PrismVariant,
};
pub use layer::{
    Axis, CornerRadius, Footprint, GlowConfig, Gradient, GradientKind, IOS_CORNER_RADIUS_RATIO,
    Layer, LayerEffect, LayerPipeline, MaskConfig, Motif, MotifDrawn, MotifLayer, RenderContext,
    ShadowConfig,
};
pub use profile::{
    BackgroundSettings, DEFAULT_RESOLUTION, GlowSettings, GradientStyle, IconProfile, MotifKind,
    MotifSettings, ShadowSettings, parse_hex_color, to_hex,
};
pub use renderer::{Configurable, IconRenderer, MasterSource};
pub use shape::{DrawCommand, DrawList, Outline, Point, Rect, Shape};
pub use svg::render_svg;
