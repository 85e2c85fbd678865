//! Ready-made size lists for common icon catalogs.
//!
//! These are naming helpers only; the exporter treats every list the same.

use crate::icon::{IconSizeSpec, Idiom, Platform};

/// Point sizes of a macOS `.iconset`, each exported at `@1x` and `@2x`.
pub const MAC_POINT_SIZES: [u32; 5] = [16, 32, 128, 256, 512];

/// A macOS-style icon set: `{prefix}-16x16.png`, `{prefix}-16x16@2x.png`, …
/// up to `{prefix}-512x512@2x.png`, plus a universal
/// `{prefix}-1024x1024.png`.
pub fn macos_icon_set(prefix: &str) -> Vec<IconSizeSpec> {
    let mut specs = Vec::with_capacity(MAC_POINT_SIZES.len() * 2 + 1);
    for points in MAC_POINT_SIZES {
        specs.push(
            IconSizeSpec::square(points, format!("{prefix}-{points}x{points}.png"))
                .with_idiom(Idiom::Mac),
        );
        specs.push(
            IconSizeSpec::square(points * 2, format!("{prefix}-{points}x{points}@2x.png"))
                .with_idiom(Idiom::Mac)
                .with_scale(2),
        );
    }
    specs.push(
        IconSizeSpec::square(1024, format!("{prefix}-1024x1024.png")).with_idiom(Idiom::Universal),
    );
    specs
}

/// The Xcode app icon set: App Store marketing icon, iPhone and iPad app
/// icons, and the macOS sizes, named `{idiom}-{points}x{points}@{scale}x.png`.
pub fn xcode_app_icon_set() -> Vec<IconSizeSpec> {
    let mut specs = vec![
        IconSizeSpec::square(1024, "ios-marketing-1024x1024@1x.png")
            .with_idiom(Idiom::Universal)
            .with_platform(Platform::Ios),
    ];

    let ios = [
        (Idiom::Iphone, "iphone", 60.0, 2),
        (Idiom::Iphone, "iphone", 60.0, 3),
        (Idiom::Ipad, "ipad", 76.0, 1),
        (Idiom::Ipad, "ipad", 76.0, 2),
        (Idiom::Ipad, "ipad", 83.5, 2),
    ];
    for (idiom, name, points, scale) in ios {
        let pixels = (points * scale as f64) as u32;
        specs.push(
            IconSizeSpec::square(pixels, format!("{name}-{points}x{points}@{scale}x.png"))
                .with_idiom(idiom)
                .with_platform(Platform::Ios)
                .with_scale(scale),
        );
    }

    for points in MAC_POINT_SIZES {
        for scale in [1, 2] {
            specs.push(
                IconSizeSpec::square(points * scale, format!("mac-{points}x{points}@{scale}x.png"))
                    .with_idiom(Idiom::Mac)
                    .with_scale(scale),
            );
        }
    }
    specs
}

/// Plain square sizes named `{prefix}-{size}.png`.
pub fn square_sizes(prefix: &str, sizes: &[u32]) -> Vec<IconSizeSpec> {
    sizes
        .iter()
        .map(|&size| IconSizeSpec::square(size, format!("{prefix}-{size}.png")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn unique(specs: &[IconSizeSpec]) -> bool {
        let names: HashSet<_> = specs.iter().map(|s| s.filename.as_str()).collect();
        names.len() == specs.len()
    }

    #[test]
    fn macos_set_names() {
        let specs = macos_icon_set("AppIcon");
        assert_eq!(specs.len(), 11);
        assert!(unique(&specs));
        assert_eq!(specs[0].filename, "AppIcon-16x16.png");
        assert_eq!(specs[1].filename, "AppIcon-16x16@2x.png");
        assert_eq!(specs[1].width, 32);
        assert_eq!(specs[9].filename, "AppIcon-512x512@2x.png");
        assert_eq!(specs[9].width, 1024);
        assert_eq!(specs[10].filename, "AppIcon-1024x1024.png");
    }

    #[test]
    fn xcode_set_pixels() {
        let specs = xcode_app_icon_set();
        assert_eq!(specs.len(), 16);
        assert!(unique(&specs));

        let ipad_pro = specs
            .iter()
            .find(|s| s.filename == "ipad-83.5x83.5@2x.png")
            .unwrap();
        assert_eq!(ipad_pro.width, 167);
        assert_eq!(ipad_pro.scale, 2);

        let iphone = specs.iter().find(|s| s.filename == "iphone-60x60@3x.png").unwrap();
        assert_eq!(iphone.width, 180);
        assert!(specs.iter().all(|s| s.width <= 1024));
    }

    #[test]
    fn square_list() {
        let specs = square_sizes("icon", &[16, 1024]);
        assert_eq!(specs[0], IconSizeSpec::square(16, "icon-16.png"));
        assert_eq!(specs[1].filename, "icon-1024.png");
    }
}
