//! Raster filters shared by the effect layers.

use image::{RgbaImage, imageops};
use rayon::prelude::*;

use crate::canvas::{Canvas, premultiply, unpremultiply};

// ---------------------------------------------------------------------------
//  Parallel separable Gaussian blur (rayon)
// ---------------------------------------------------------------------------

/// Builds a normalized 1-D Gaussian kernel truncated at `ceil(3 * sigma)`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = if sigma.is_finite() && sigma > 0.0 {
        (sigma * 3.0).ceil() as usize
    } else {
        0
    };
    if radius == 0 {
        return vec![1.0];
    }
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..radius * 2 + 1)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let inv = 1.0 / kernel.iter().sum::<f32>();
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

/// Returns a Gaussian-blurred copy of `canvas`.
///
/// Only the bounding box of non-transparent pixels, padded by the kernel
/// radius, is processed; everything outside it stays transparent. Colors are
/// blurred premultiplied so transparent neighbours do not darken edges.
pub fn gaussian_blur(canvas: &Canvas, sigma: f32) -> Canvas {
    let kernel = gaussian_kernel(sigma);
    if kernel.len() == 1 {
        return canvas.clone();
    }
    let src = canvas.image();
    let Some((x0, y0, x1, y1)) = visible_bounds(src) else {
        return canvas.clone();
    };

    let pad = (kernel.len() / 2) as u32;
    let crop_x = x0.saturating_sub(pad);
    let crop_y = y0.saturating_sub(pad);
    let crop_w = (x1 + pad).min(src.width()) - crop_x;
    let crop_h = (y1 + pad).min(src.height()) - crop_y;

    let region = imageops::crop_imm(src, crop_x, crop_y, crop_w, crop_h).to_image();
    let blurred = blur_premultiplied(&region, &kernel);

    let mut out = Canvas::new(canvas.size()).with_blend_mode(canvas.blend_mode());
    imageops::replace(out.image_mut(), &blurred, crop_x as i64, crop_y as i64);
    out
}

/// Half-open bounds `(x0, y0, x1, y1)` of pixels with non-zero alpha.
fn visible_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let (mut x0, mut y0) = (u32::MAX, u32::MAX);
    let (mut x1, mut y1) = (0, 0);
    for (x, y, px) in image.enumerate_pixels() {
        if px[3] > 0 {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x + 1);
            y1 = y1.max(y + 1);
        }
    }
    (x0 < x1).then_some((x0, y0, x1, y1))
}

/// Separable blur over premultiplied `f32` channels, edges clamped.
fn blur_premultiplied(src: &RgbaImage, kernel: &[f32]) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let radius = kernel.len() / 2;
    let stride = w * 4;

    let buf_in: Vec<f32> = src
        .as_raw()
        .chunks_exact(4)
        .flat_map(|p| premultiply(p[0], p[1], p[2], p[3]))
        .map(f32::from)
        .collect();

    // Horizontal pass (parallel by row)
    let mut buf_h = vec![0.0f32; w * h * 4];
    buf_h.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let row_in = &buf_in[y * stride..(y + 1) * stride];
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = (x + ki).saturating_sub(radius).min(w - 1);
                for (c, v) in acc.iter_mut().enumerate() {
                    *v += row_in[sx * 4 + c] * kv;
                }
            }
            row_out[x * 4..x * 4 + 4].copy_from_slice(&acc);
        }
    });

    // Vertical pass (parallel by row)
    let mut buf_v = vec![0.0f32; w * h * 4];
    buf_v.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = (y + ki).saturating_sub(radius).min(h - 1);
                let idx = sy * stride + x * 4;
                for (c, v) in acc.iter_mut().enumerate() {
                    *v += buf_h[idx + c] * kv;
                }
            }
            row_out[x * 4..x * 4 + 4].copy_from_slice(&acc);
        }
    });

    let mut out = RgbaImage::new(w as u32, h as u32);
    for (dst, px) in out.chunks_exact_mut(4).zip(buf_v.chunks_exact(4)) {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        dst.copy_from_slice(&unpremultiply(q(px[0]), q(px[1]), q(px[2]), q(px[3])));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::rgba;
    use crate::shape::{Point, Shape};

    #[test]
    fn kernel_is_normalized_and_truncated() {
        let kernel = gaussian_kernel(2.0);
        assert_eq!(kernel.len(), 13);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(kernel[6] > kernel[5] && kernel[5] > kernel[0]);

        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel(f32::NAN), vec![1.0]);
    }

    #[test]
    fn blur_spreads_alpha() {
        let mut canvas = Canvas::new(64);
        canvas
            .fill_shape(&Shape::circle(Point::new(32.0, 32.0), 8.0), rgba(0, 0, 0, 200), None)
            .unwrap();
        let blurred = gaussian_blur(&canvas, 4.0);

        let center = blurred.pixel(32, 32).unwrap();
        assert!(center.alpha > 0 && center.alpha < 200);
        // Outside the disc but within the kernel reach.
        assert!(blurred.pixel(32, 44).unwrap().alpha > 0);
        // Far away corner stays clear.
        assert_eq!(blurred.pixel(0, 0).unwrap().alpha, 0);
        // Color is preserved under the alpha.
        assert_eq!(blurred.pixel(32, 44).unwrap().red, 0);
    }

    #[test]
    fn blur_of_empty_canvas_is_empty() {
        let canvas = Canvas::new(16);
        assert_eq!(gaussian_blur(&canvas, 3.0), canvas);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let mut canvas = Canvas::new(8);
        canvas.set_pixel(3, 3, rgba(1, 2, 3, 4));
        assert_eq!(gaussian_blur(&canvas, 0.0), canvas);
    }
}
