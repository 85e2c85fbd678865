//! Icon size declarations and the manifest of exported files.
//!
//! An [`IconSizeSpec`] is one requested output (pixel size plus filename and
//! optional platform tags). Every file the exporter writes is recorded as a
//! [`ManifestEntry`]; the [`Manifest`] is what a downstream asset-catalog
//! writer consumes.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A `size x size` square.
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

// ============================================================================
// Platform tags
// ============================================================================

/// Device family an icon is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Idiom {
    Universal,
    Iphone,
    Ipad,
    Mac,
    IosMarketing,
}

impl Idiom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Universal => "universal",
            Self::Iphone => "iphone",
            Self::Ipad => "ipad",
            Self::Mac => "mac",
            Self::IosMarketing => "ios-marketing",
        }
    }
}

/// Operating system an icon is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Platform {
    Ios,
}

// ============================================================================
// IconSizeSpec
// ============================================================================

fn default_scale() -> u32 {
    1
}

fn is_default_scale(scale: &u32) -> bool {
    *scale == 1
}

/// One requested output image.
///
/// `width` and `height` are in pixels. `scale` is the display scale factor
/// (`@2x` is 2); the logical point size is `width / scale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconSizeSpec {
    pub width: u32,
    pub height: u32,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idiom: Option<Idiom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default = "default_scale", skip_serializing_if = "is_default_scale")]
    pub scale: u32,
}

impl IconSizeSpec {
    /// A square spec with no platform tags.
    pub fn square(size: u32, filename: impl Into<String>) -> Self {
        Self {
            width: size,
            height: size,
            filename: filename.into(),
            idiom: None,
            platform: None,
            scale: 1,
        }
    }

    pub fn with_idiom(mut self, idiom: Idiom) -> Self {
        self.idiom = Some(idiom);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }
}

// ============================================================================
// Manifest
// ============================================================================

/// Record of one successfully written file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idiom: Option<Idiom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    pub scale: u32,
}

impl ManifestEntry {
    /// Records `spec` as realized at its declared size.
    pub fn from_spec(spec: &IconSizeSpec) -> Self {
        Self {
            filename: spec.filename.clone(),
            width: spec.width,
            height: spec.height,
            idiom: spec.idiom,
            platform: spec.platform,
            scale: spec.scale,
        }
    }

    /// Logical size in points, e.g. `"83.5x83.5"` for a 167 px `@2x` image.
    pub fn point_size(&self) -> String {
        let scale = self.scale.max(1) as f64;
        let points = |px: u32| {
            let v = px as f64 / scale;
            if v.fract() == 0.0 {
                format!("{}", v as u64)
            } else {
                format!("{v}")
            }
        };
        format!("{}x{}", points(self.width), points(self.height))
    }
}

/// The ordered list of files an export produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

#[derive(Serialize)]
struct ContentsImage<'a> {
    filename: &'a str,
    idiom: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<Platform>,
    scale: String,
    size: String,
}

#[derive(Serialize)]
struct ContentsInfo {
    author: &'static str,
    version: u32,
}

#[derive(Serialize)]
struct Contents<'a> {
    images: Vec<ContentsImage<'a>>,
    info: ContentsInfo,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    /// Finds the entry written under `filename`.
    pub fn find(&self, filename: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    /// Renders the entries as an asset-catalog `Contents.json` document.
    ///
    /// Entries without an idiom are listed as `universal`.
    pub fn to_contents_json(&self) -> Result<String> {
        let contents = Contents {
            images: self
                .entries
                .iter()
                .map(|e| ContentsImage {
                    filename: &e.filename,
                    idiom: e.idiom.unwrap_or(Idiom::Universal).as_str(),
                    platform: e.platform,
                    scale: format!("{}x", e.scale),
                    size: e.point_size(),
                })
                .collect(),
            info: ContentsInfo {
                author: "xcode",
                version: 1,
            },
        };
        Ok(serde_json::to_string_pretty(&contents)?)
    }
}

impl IntoIterator for Manifest {
    type Item = ManifestEntry;
    type IntoIter = std::vec::IntoIter<ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_px_is_square() {
        assert!(SizePx::square(100).is_square());
        assert!(!SizePx::new(100, 200).is_square());
    }

    #[test]
    fn spec_json_defaults() {
        let spec: IconSizeSpec =
            serde_json::from_str(r#"{"width":16,"height":16,"filename":"icon-16.png"}"#).unwrap();
        assert_eq!(spec, IconSizeSpec::square(16, "icon-16.png"));

        let json = serde_json::to_string(&spec).unwrap();
        assert!(!json.contains("scale"));
        assert!(!json.contains("idiom"));
    }

    #[test]
    fn idiom_names() {
        let json = serde_json::to_string(&Idiom::IosMarketing).unwrap();
        assert_eq!(json, "\"ios-marketing\"");
        assert_eq!(Idiom::IosMarketing.as_str(), "ios-marketing");
        let json = serde_json::to_string(&Platform::Ios).unwrap();
        assert_eq!(json, "\"ios\"");
    }

    #[test]
    fn fractional_point_size() {
        let spec = IconSizeSpec::square(167, "ipad-83.5x83.5@2x.png")
            .with_idiom(Idiom::Ipad)
            .with_scale(2);
        assert_eq!(ManifestEntry::from_spec(&spec).point_size(), "83.5x83.5");

        let spec = IconSizeSpec::square(180, "iphone-60x60@3x.png").with_scale(3);
        assert_eq!(ManifestEntry::from_spec(&spec).point_size(), "60x60");
    }

    #[test]
    fn contents_json_shape() {
        let mut manifest = Manifest::new();
        manifest.push(ManifestEntry::from_spec(
            &IconSizeSpec::square(1024, "ios-marketing-1024x1024@1x.png")
                .with_idiom(Idiom::IosMarketing)
                .with_platform(Platform::Ios),
        ));
        manifest.push(ManifestEntry::from_spec(&IconSizeSpec::square(64, "plain.png").with_scale(2)));

        let json = manifest.to_contents_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["info"]["author"], "xcode");
        assert_eq!(value["info"]["version"], 1);

        let images = value["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["idiom"], "ios-marketing");
        assert_eq!(images[0]["platform"], "ios");
        assert_eq!(images[0]["size"], "1024x1024");
        assert_eq!(images[1]["idiom"], "universal");
        assert_eq!(images[1]["scale"], "2x");
        assert_eq!(images[1]["size"], "32x32");
        assert!(images[1].get("platform").is_none());
    }

    #[test]
    fn manifest_lookup() {
        let mut manifest = Manifest::new();
        assert!(manifest.is_empty());
        manifest.push(ManifestEntry::from_spec(&IconSizeSpec::square(16, "a.png")));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.find("a.png").map(|e| e.width), Some(16));
        assert!(manifest.find("b.png").is_none());
    }
}
