//! Serializable icon profiles.
//!
//! An [`IconProfile`] captures everything needed to reproduce a master and
//! its export batch: authoring resolution, background gradient, motif,
//! effect settings, corner mask and the list of output sizes. It
//! round-trips through JSON so recipes can live next to the project that
//! uses them.
//!
//! # Example
//!
//! ```
//! use prism_icons::{BackgroundSettings, GradientStyle, IconProfile, MotifKind, MotifSettings};
//!
//! let profile = IconProfile::new()
//!     .with_background(BackgroundSettings::new(GradientStyle::Radial, "#7850c8", "#503296"))
//!     .with_motif(MotifSettings::new(MotifKind::Prism));
//!
//! let json = profile.to_json().unwrap();
//! let restored = IconProfile::from_json(&json).unwrap();
//! assert_eq!(restored.motif.unwrap().kind, MotifKind::Prism);
//! ```

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::canvas::{Color, rgba};
use crate::catalog::{macos_icon_set, square_sizes};
use crate::error::{IconError, Result};
use crate::export::ResampleFilter;
use crate::icon::IconSizeSpec;
use crate::layer::motif::{
    ChatBubbleMotif, FaceAlphas, MotifLayer, NeuralNetworkMotif, PrismMotif, PrismVariant,
};
use crate::layer::{Axis, GlowConfig, Gradient, GradientKind, IOS_CORNER_RADIUS_RATIO, ShadowConfig};

/// Authoring resolution used when a profile does not name one.
pub const DEFAULT_RESOLUTION: u32 = 1024;

fn default_true() -> bool {
    true
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

// ============================================================================
// Colors
// ============================================================================

/// Parses an opaque `#rrggbb` (or `#rgb`) color. The leading `#` is optional.
pub fn parse_hex_color(value: &str) -> Result<Color> {
    let rgb: Srgb<u8> = value.trim().parse().map_err(|err| IconError::InvalidColor {
        value: value.to_string(),
        reason: format!("{err}"),
    })?;
    Ok(rgba(rgb.red, rgb.green, rgb.blue, 255))
}

/// Formats the color channels of `color` as `#rrggbb`. Alpha is dropped.
pub fn to_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ============================================================================
// Layer Settings (Serializable)
// ============================================================================

/// Shape of the background gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum GradientStyle {
    #[default]
    Radial,
    Vertical,
    Horizontal,
    Diagonal,
}

impl From<GradientKind> for GradientStyle {
    fn from(kind: GradientKind) -> Self {
        match kind {
            GradientKind::Radial => Self::Radial,
            GradientKind::Linear(Axis::Vertical) => Self::Vertical,
            GradientKind::Linear(Axis::Horizontal) => Self::Horizontal,
            GradientKind::Linear(Axis::Diagonal) => Self::Diagonal,
        }
    }
}

impl From<GradientStyle> for GradientKind {
    fn from(style: GradientStyle) -> Self {
        match style {
            GradientStyle::Radial => Self::Radial,
            GradientStyle::Vertical => Self::Linear(Axis::Vertical),
            GradientStyle::Horizontal => Self::Linear(Axis::Horizontal),
            GradientStyle::Diagonal => Self::Linear(Axis::Diagonal),
        }
    }
}

/// Serializable settings for the background layer.
///
/// `from` is the center (radial) or start (linear) color, `to` the edge or
/// end color. Both are hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BackgroundSettings {
    #[serde(default)]
    pub style: GradientStyle,
    pub from: String,
    pub to: String,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl BackgroundSettings {
    pub fn new(style: GradientStyle, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            style,
            from: from.into(),
            to: to.into(),
            enabled: true,
        }
    }

    /// Parses the colors into a [`Gradient`].
    pub fn to_gradient(&self) -> Result<Gradient> {
        Ok(Gradient {
            kind: self.style.into(),
            from: parse_hex_color(&self.from)?,
            to: parse_hex_color(&self.to)?,
        })
    }

    pub(crate) fn from_gradient(gradient: &Gradient, enabled: bool) -> Self {
        Self {
            style: gradient.kind.into(),
            from: to_hex(gradient.from),
            to: to_hex(gradient.to),
            enabled,
        }
    }
}

/// Which motif a profile draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum MotifKind {
    #[default]
    Prism,
    PrismAlternate,
    ChatBubble,
    NeuralNetwork,
}

/// Serializable settings for the motif layer.
///
/// Motif geometry is derived from the profile resolution. `faceAlphas`
/// only applies to the prism kinds and overrides the variant defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct MotifSettings {
    pub kind: MotifKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_alphas: Option<FaceAlphas>,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl MotifSettings {
    pub fn new(kind: MotifKind) -> Self {
        Self {
            kind,
            face_alphas: None,
            enabled: true,
        }
    }

    pub fn with_face_alphas(mut self, face_alphas: FaceAlphas) -> Self {
        self.face_alphas = Some(face_alphas);
        self
    }

    /// Builds the motif for a `resolution x resolution` master.
    pub fn to_layer(&self, resolution: u32) -> MotifLayer {
        let prism = |motif: PrismMotif| match self.face_alphas {
            Some(alphas) => motif.with_face_alphas(alphas),
            None => motif,
        };
        match self.kind {
            MotifKind::Prism => prism(PrismMotif::classic(resolution)).into(),
            MotifKind::PrismAlternate => prism(PrismMotif::alternate(resolution)).into(),
            MotifKind::ChatBubble => ChatBubbleMotif::new(resolution).into(),
            MotifKind::NeuralNetwork => NeuralNetworkMotif::new(resolution).into(),
        }
    }

    pub(crate) fn from_layer(layer: &MotifLayer, enabled: bool) -> Self {
        let (kind, face_alphas) = match layer {
            MotifLayer::Prism(prism) => match prism.variant {
                PrismVariant::Classic => (
                    MotifKind::Prism,
                    Some(prism.face_alphas).filter(|a| *a != FaceAlphas::CLASSIC),
                ),
                PrismVariant::Alternate => (
                    MotifKind::PrismAlternate,
                    Some(prism.face_alphas).filter(|a| *a != FaceAlphas::ALTERNATE),
                ),
            },
            MotifLayer::ChatBubble(_) => (MotifKind::ChatBubble, None),
            MotifLayer::NeuralNetwork(_) => (MotifKind::NeuralNetwork, None),
        };
        Self {
            kind,
            face_alphas,
            enabled,
        }
    }
}

/// Serializable settings for the drop shadow layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ShadowSettings {
    /// Gaussian standard deviation in pixels.
    pub blur_radius: f32,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl From<ShadowSettings> for ShadowConfig {
    fn from(settings: ShadowSettings) -> Self {
        ShadowConfig::new(settings.blur_radius)
    }
}

/// Serializable settings for the glow layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GlowSettings {
    pub steps: u32,
    /// Outset between consecutive steps, in pixels.
    pub spacing: f32,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl From<GlowSettings> for GlowConfig {
    fn from(settings: GlowSettings) -> Self {
        GlowConfig {
            steps: settings.steps,
            spacing: settings.spacing,
            ..GlowConfig::default()
        }
    }
}

// ============================================================================
// IconProfile
// ============================================================================

/// A serializable recipe for one icon and its export batch.
///
/// # JSON Format
///
/// ```json
/// {
///   "resolution": 1024,
///   "background": { "style": "diagonal", "from": "#663399", "to": "#ff8296" },
///   "motif": { "kind": "prism" },
///   "shadow": { "blurRadius": 20.0 },
///   "cornerRadiusRatio": 0.2237,
///   "sizes": [{ "width": 16, "height": 16, "filename": "icon-16.png" }],
///   "filter": "area"
/// }
/// ```
///
/// A missing layer section leaves that layer unconfigured. A missing
/// `cornerRadiusRatio` leaves the master unmasked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconProfile {
    /// Edge length of the square master, in pixels.
    #[serde(default = "default_resolution")]
    pub resolution: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif: Option<MotifSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<GlowSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius_ratio: Option<f32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<IconSizeSpec>,

    #[serde(default)]
    pub filter: ResampleFilter,
}

impl Default for IconProfile {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            background: None,
            motif: None,
            shadow: None,
            glow: None,
            corner_radius_ratio: None,
            sizes: Vec::new(),
            filter: ResampleFilter::default(),
        }
    }
}

impl IconProfile {
    /// Creates an empty profile at the default resolution.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_background(mut self, settings: BackgroundSettings) -> Self {
        self.background = Some(settings);
        self
    }

    pub fn with_motif(mut self, settings: MotifSettings) -> Self {
        self.motif = Some(settings);
        self
    }

    pub fn with_shadow(mut self, settings: ShadowSettings) -> Self {
        self.shadow = Some(settings);
        self
    }

    pub fn with_glow(mut self, settings: GlowSettings) -> Self {
        self.glow = Some(settings);
        self
    }

    pub fn with_corner_radius_ratio(mut self, ratio: f32) -> Self {
        self.corner_radius_ratio = Some(ratio);
        self
    }

    pub fn with_sizes(mut self, sizes: Vec<IconSizeSpec>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // ------------------------------------------------------------------------
    // Presets
    // ------------------------------------------------------------------------

    /// Classic prism on a diagonal purple-to-coral field with a soft shadow,
    /// exported as a macOS icon set.
    pub fn classic_prism() -> Self {
        Self::new()
            .with_background(BackgroundSettings::new(GradientStyle::Diagonal, "#663399", "#ff8296"))
            .with_motif(MotifSettings::new(MotifKind::Prism))
            .with_shadow(ShadowSettings {
                blur_radius: 20.0,
                enabled: true,
            })
            .with_corner_radius_ratio(IOS_CORNER_RADIUS_RATIO)
            .with_sizes(macos_icon_set("AppIcon"))
    }

    /// Upright prism on a vertical blue-to-violet field, no effects.
    pub fn alternate_prism() -> Self {
        Self::new()
            .with_background(BackgroundSettings::new(GradientStyle::Vertical, "#3b82f6", "#934ff6"))
            .with_motif(MotifSettings::new(MotifKind::PrismAlternate))
            .with_corner_radius_ratio(IOS_CORNER_RADIUS_RATIO)
            .with_sizes(macos_icon_set("AppIcon"))
    }

    /// Chat bubble with a white halo on a radial purple field.
    pub fn chat_bubble() -> Self {
        Self::new()
            .with_background(BackgroundSettings::new(GradientStyle::Radial, "#7850c8", "#503296"))
            .with_motif(MotifSettings::new(MotifKind::ChatBubble))
            .with_glow(GlowSettings {
                steps: 5,
                spacing: 5.0,
                enabled: true,
            })
            .with_corner_radius_ratio(IOS_CORNER_RADIUS_RATIO)
            .with_sizes(square_sizes("AppIcon", &[16, 32, 64, 128, 256, 512, 1024]))
    }

    /// Neural network on a vertical blue-to-purple field.
    pub fn neural_network() -> Self {
        Self::new()
            .with_background(BackgroundSettings::new(GradientStyle::Vertical, "#3b82f6", "#9333ea"))
            .with_motif(MotifSettings::new(MotifKind::NeuralNetwork))
            .with_corner_radius_ratio(IOS_CORNER_RADIUS_RATIO)
            .with_sizes(square_sizes("AppIcon", &[16, 32, 64, 128, 256, 512, 1024]))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#7850c8").unwrap(), rgba(120, 80, 200, 255));
        assert_eq!(parse_hex_color("503296").unwrap(), rgba(80, 50, 150, 255));
        assert_eq!(to_hex(rgba(102, 51, 153, 10)), "#663399");
    }

    #[test]
    fn bad_hex_is_invalid_color() {
        let err = parse_hex_color("#12345z").unwrap_err();
        assert!(matches!(err, IconError::InvalidColor { ref value, .. } if value == "#12345z"));

        let settings = BackgroundSettings::new(GradientStyle::Radial, "purple", "#000000");
        assert!(matches!(settings.to_gradient(), Err(IconError::InvalidColor { .. })));
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = IconProfile::classic_prism();
        let json = profile.to_json().unwrap();
        let restored = IconProfile::from_json(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn profile_json_format() {
        let profile = IconProfile::new()
            .with_motif(MotifSettings::new(MotifKind::ChatBubble))
            .with_shadow(ShadowSettings {
                blur_radius: 12.0,
                enabled: false,
            })
            .with_corner_radius_ratio(0.2);

        let json = profile.to_json_pretty().unwrap();

        assert!(json.contains("\"chat-bubble\""));
        assert!(json.contains("\"blurRadius\""));
        assert!(json.contains("\"cornerRadiusRatio\""));
        assert!(!json.contains("\"glow\""));
        assert!(!json.contains("\"sizes\""));
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = IconProfile::from_json("{}").unwrap();
        assert_eq!(profile.resolution, DEFAULT_RESOLUTION);
        assert!(profile.background.is_none());
        assert!(profile.motif.is_none());
        assert!(profile.corner_radius_ratio.is_none());
        assert!(profile.sizes.is_empty());
        assert_eq!(profile.filter, ResampleFilter::Area);
    }

    #[test]
    fn enabled_defaults_to_true() {
        let profile =
            IconProfile::from_json(r#"{"motif":{"kind":"neural-network"},"glow":{"steps":3,"spacing":4.0}}"#)
                .unwrap();
        assert!(profile.motif.unwrap().enabled);
        assert!(profile.glow.unwrap().enabled);
    }

    #[test]
    fn motif_settings_build_at_resolution() {
        let layer = MotifSettings::new(MotifKind::Prism).to_layer(512);
        assert_eq!(layer, MotifLayer::Prism(PrismMotif::classic(512)));

        let custom = FaceAlphas {
            front: 255,
            ..FaceAlphas::ALTERNATE
        };
        let layer = MotifSettings::new(MotifKind::PrismAlternate)
            .with_face_alphas(custom)
            .to_layer(256);
        let MotifLayer::Prism(prism) = &layer else {
            panic!("expected a prism");
        };
        assert_eq!(prism.face_alphas, custom);
        assert_eq!(MotifSettings::from_layer(&layer, true).face_alphas, Some(custom));

        let stock = MotifSettings::from_layer(&PrismMotif::alternate(256).into(), false);
        assert_eq!(stock.kind, MotifKind::PrismAlternate);
        assert_eq!(stock.face_alphas, None);
        assert!(!stock.enabled);
    }

    #[test]
    fn gradient_style_mapping() {
        let settings = BackgroundSettings::new(GradientStyle::Diagonal, "#000000", "#ffffff");
        let gradient = settings.to_gradient().unwrap();
        assert_eq!(gradient.kind, GradientKind::Linear(Axis::Diagonal));
        assert_eq!(BackgroundSettings::from_gradient(&gradient, true), settings);
    }

    #[test]
    fn presets_parse() {
        for profile in [
            IconProfile::classic_prism(),
            IconProfile::alternate_prism(),
            IconProfile::chat_bubble(),
            IconProfile::neural_network(),
        ] {
            assert!(profile.background.unwrap().to_gradient().is_ok());
            assert!(!profile.sizes.is_empty());
            assert!(profile.sizes.iter().all(|s| s.width <= profile.resolution));
        }
    }
}
