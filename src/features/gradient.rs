//! Sobel gradients with magnitude and unsigned orientation.
//!
//! Convolves the 3×3 Sobel pair with border clamping and reports, per
//! pixel, the Euclidean magnitude and the gradient orientation folded to
//! [0°, 180°) for unsigned orientation binning.
use crate::image::ImageF32;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel gradient magnitude and folded orientation.
pub(crate) struct GradientField {
    /// Euclidean magnitude per pixel
    pub mag: ImageF32,
    /// Orientation in degrees, [0, 180) per pixel, row-major
    pub ori_deg: Vec<f32>,
}

/// Compute Sobel magnitude/orientation on a single-channel float plane.
pub(crate) fn sobel_gradient_field(l: &ImageF32) -> GradientField {
    let w = l.w;
    let h = l.h;
    let mut mag = ImageF32::new(w, h);
    let mut ori_deg = vec![0.0f32; w * h];
    if w == 0 || h == 0 {
        return GradientField { mag, ori_deg };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut gx = 0.0;
            let mut gy = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                gx += row[x_idx[0]] * kx_row[0]
                    + row[x_idx[1]] * kx_row[1]
                    + row[x_idx[2]] * kx_row[2];
                gy += row[x_idx[0]] * ky_row[0]
                    + row[x_idx[1]] * ky_row[1]
                    + row[x_idx[2]] * ky_row[2];
            }

            out_mag[x] = (gx * gx + gy * gy).sqrt();
            ori_deg[y * w + x] = fold_half_circle(gy.atan2(gx).to_degrees());
        }
    }

    GradientField { mag, ori_deg }
}

#[inline]
fn fold_half_circle(angle_deg: f32) -> f32 {
    let mut a = angle_deg.rem_euclid(180.0);
    if a >= 180.0 {
        a -= 180.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::sobel_gradient_field;
    use crate::image::ImageF32;

    #[test]
    fn vertical_edge_has_horizontal_gradient() {
        let mut img = ImageF32::new(8, 8);
        for y in 0..8 {
            for x in 4..8 {
                img.set(x, y, 1.0);
            }
        }
        let field = sobel_gradient_field(&img);
        // At the edge column the gradient points along +x, orientation 0.
        let idx = img.idx(4, 4);
        assert!(field.mag.get(4, 4) > 0.0);
        assert!(field.ori_deg[idx] < 1.0 || field.ori_deg[idx] > 179.0);
        // Far from the edge the magnitude vanishes.
        assert_eq!(field.mag.get(1, 4), 0.0);
    }

    #[test]
    fn horizontal_edge_has_vertical_orientation() {
        let mut img = ImageF32::new(8, 8);
        for y in 4..8 {
            for x in 0..8 {
                img.set(x, y, 1.0);
            }
        }
        let field = sobel_gradient_field(&img);
        let idx = img.idx(4, 4);
        assert!((field.ori_deg[idx] - 90.0).abs() < 1.0);
    }
}
