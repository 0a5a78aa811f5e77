//! Per-channel color histogram block.
use crate::image::RgbImageU8;

/// Histogram each channel into `nbins` equal bins over [0, 256) and
/// concatenate ch0 ‖ ch1 ‖ ch2. Bin count and range are layout invariants
/// shared between training and inference.
pub fn color_histogram(patch: &RgbImageU8, nbins: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; nbins * 3];
    for y in 0..patch.h {
        let row = patch.row(y);
        for x in 0..patch.w {
            for c in 0..3 {
                let v = row[x * 3 + c] as usize;
                let bin = v * nbins / 256;
                out[c * nbins + bin] += 1.0;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::color_histogram;
    use crate::image::RgbImageU8;

    #[test]
    fn counts_sum_to_pixel_count_per_channel() {
        let mut img = RgbImageU8::new(6, 4);
        for (i, v) in img.data.iter_mut().enumerate() {
            *v = (i * 11 % 256) as u8;
        }
        let hist = color_histogram(&img, 32);
        assert_eq!(hist.len(), 96);
        for c in 0..3 {
            let total: f32 = hist[c * 32..(c + 1) * 32].iter().sum();
            assert_eq!(total, 24.0);
        }
    }

    #[test]
    fn extreme_values_land_in_end_bins() {
        let mut img = RgbImageU8::new(2, 1);
        img.set(0, 0, [0, 0, 0]);
        img.set(1, 0, [255, 255, 255]);
        let hist = color_histogram(&img, 32);
        for c in 0..3 {
            assert_eq!(hist[c * 32], 1.0);
            assert_eq!(hist[c * 32 + 31], 1.0);
        }
    }

    #[test]
    fn histogram_is_mirror_invariant() {
        let mut img = RgbImageU8::new(8, 3);
        for (i, v) in img.data.iter_mut().enumerate() {
            *v = (i * 37 % 256) as u8;
        }
        let flipped = img.flip_horizontal();
        assert_eq!(color_histogram(&img, 16), color_histogram(&flipped, 16));
    }
}
