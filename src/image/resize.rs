//! Raster resampling for the window and scale transforms.
//!
//! Two interpolation modes are used by the pipeline:
//! - `resize_area`: coverage-weighted box average. Used when resampling a
//!   candidate window to the canonical classifier size and for spatial
//!   binning, where downscale quality matters.
//! - `resize_bilinear`: standard bilinear with half-pixel centre alignment.
//!   Used by the sub-sampling path when rescaling a search region by
//!   `1/scale`.
//!
//! Resizing to the source size returns an identical copy in both modes.
use super::RgbImageU8;

/// Area-preserving resample of an interleaved RGB image.
pub fn resize_area(src: &RgbImageU8, dst_w: usize, dst_h: usize) -> RgbImageU8 {
    assert!(src.w > 0 && src.h > 0, "source image must be non-empty");
    assert!(dst_w > 0 && dst_h > 0, "target size must be positive");
    if dst_w == src.w && dst_h == src.h {
        return src.clone();
    }

    let scale_x = src.w as f64 / dst_w as f64;
    let scale_y = src.h as f64 / dst_h as f64;
    let mut out = RgbImageU8::new(dst_w, dst_h);

    for oy in 0..dst_h {
        let sy0 = oy as f64 * scale_y;
        let sy1 = (oy + 1) as f64 * scale_y;
        for ox in 0..dst_w {
            let sx0 = ox as f64 * scale_x;
            let sx1 = (ox + 1) as f64 * scale_x;

            let mut acc = [0.0f64; 3];
            let mut area = 0.0f64;
            let y_lo = sy0.floor() as usize;
            let y_hi = (sy1.ceil() as usize).min(src.h);
            let x_lo = sx0.floor() as usize;
            let x_hi = (sx1.ceil() as usize).min(src.w);
            for sy in y_lo..y_hi {
                let wy = overlap(sy as f64, (sy + 1) as f64, sy0, sy1);
                if wy <= 0.0 {
                    continue;
                }
                let row = src.row(sy);
                for sx in x_lo..x_hi {
                    let wx = overlap(sx as f64, (sx + 1) as f64, sx0, sx1);
                    if wx <= 0.0 {
                        continue;
                    }
                    let w = wx * wy;
                    let base = sx * 3;
                    acc[0] += row[base] as f64 * w;
                    acc[1] += row[base + 1] as f64 * w;
                    acc[2] += row[base + 2] as f64 * w;
                    area += w;
                }
            }
            let px = [
                (acc[0] / area).round() as u8,
                (acc[1] / area).round() as u8,
                (acc[2] / area).round() as u8,
            ];
            out.set(ox, oy, px);
        }
    }
    out
}

/// Bilinear resample with half-pixel centre alignment and border clamping.
pub fn resize_bilinear(src: &RgbImageU8, dst_w: usize, dst_h: usize) -> RgbImageU8 {
    assert!(src.w > 0 && src.h > 0, "source image must be non-empty");
    assert!(dst_w > 0 && dst_h > 0, "target size must be positive");
    if dst_w == src.w && dst_h == src.h {
        return src.clone();
    }

    let scale_x = src.w as f64 / dst_w as f64;
    let scale_y = src.h as f64 / dst_h as f64;
    let mut out = RgbImageU8::new(dst_w, dst_h);

    for oy in 0..dst_h {
        let sy = ((oy as f64 + 0.5) * scale_y - 0.5).max(0.0);
        let y0 = (sy.floor() as usize).min(src.h - 1);
        let y1 = (y0 + 1).min(src.h - 1);
        let fy = sy - y0 as f64;
        for ox in 0..dst_w {
            let sx = ((ox as f64 + 0.5) * scale_x - 0.5).max(0.0);
            let x0 = (sx.floor() as usize).min(src.w - 1);
            let x1 = (x0 + 1).min(src.w - 1);
            let fx = sx - x0 as f64;

            let p00 = src.get(x0, y0);
            let p10 = src.get(x1, y0);
            let p01 = src.get(x0, y1);
            let p11 = src.get(x1, y1);
            let mut px = [0u8; 3];
            for c in 0..3 {
                let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
                let bot = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
                px[c] = (top * (1.0 - fy) + bot * fy).round() as u8;
            }
            out.set(ox, oy, px);
        }
    }
    out
}

#[inline]
fn overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::{resize_area, resize_bilinear};
    use crate::image::RgbImageU8;

    #[test]
    fn same_size_is_identity() {
        let mut src = RgbImageU8::new(4, 4);
        src.set(1, 2, [10, 20, 30]);
        assert_eq!(resize_area(&src, 4, 4).data, src.data);
        assert_eq!(resize_bilinear(&src, 4, 4).data, src.data);
    }

    #[test]
    fn area_downscale_averages_blocks() {
        // 4x4 image, top-left 2x2 block white, rest black: area resize to
        // 2x2 must produce one pure white and three pure black pixels.
        let mut src = RgbImageU8::new(4, 4);
        for y in 0..2 {
            for x in 0..2 {
                src.set(x, y, [255, 255, 255]);
            }
        }
        let out = resize_area(&src, 2, 2);
        assert_eq!(out.get(0, 0), [255, 255, 255]);
        assert_eq!(out.get(1, 0), [0, 0, 0]);
        assert_eq!(out.get(0, 1), [0, 0, 0]);
        assert_eq!(out.get(1, 1), [0, 0, 0]);
    }

    #[test]
    fn area_preserves_constant_images() {
        let mut src = RgbImageU8::new(7, 5);
        for i in 0..src.data.len() {
            src.data[i] = 77;
        }
        let out = resize_area(&src, 3, 2);
        assert!(out.data.iter().all(|&v| v == 77));
    }

    #[test]
    fn bilinear_upscale_interpolates() {
        let mut src = RgbImageU8::new(2, 1);
        src.set(0, 0, [0, 0, 0]);
        src.set(1, 0, [200, 200, 200]);
        let out = resize_bilinear(&src, 4, 1);
        // Edge samples clamp, inner samples fall between the two sources.
        assert!(out.get(0, 0)[0] < out.get(1, 0)[0]);
        assert!(out.get(1, 0)[0] < out.get(2, 0)[0]);
        assert!(out.get(2, 0)[0] <= out.get(3, 0)[0]);
    }
}
