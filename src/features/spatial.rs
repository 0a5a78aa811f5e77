//! Spatial-binning block: a small area-resampled copy of the patch used
//! as a raw color layout feature.
use crate::image::{resize_area, RgbImageU8};

/// Resample the patch to `size × size` and flatten channel-major: the full
/// channel-0 plane row-major, then channel 1, then channel 2. Values stay
/// in the raw [0, 255] range; standardization happens in the scaler.
pub fn bin_spatial(patch: &RgbImageU8, size: usize) -> Vec<f32> {
    let resized = resize_area(patch, size, size);
    let mut out = Vec::with_capacity(size * size * 3);
    for c in 0..3 {
        for y in 0..size {
            let row = resized.row(y);
            for x in 0..size {
                out.push(row[x * 3 + c] as f32);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::bin_spatial;
    use crate::image::RgbImageU8;

    #[test]
    fn length_and_layout() {
        let mut img = RgbImageU8::new(4, 4);
        img.set(0, 0, [10, 20, 30]);
        let feats = bin_spatial(&img, 4);
        assert_eq!(feats.len(), 4 * 4 * 3);
        // Channel-major: first plane is red.
        assert_eq!(feats[0], 10.0);
        assert_eq!(feats[16], 20.0);
        assert_eq!(feats[32], 30.0);
    }

    #[test]
    fn mirrored_patch_mirrors_columns() {
        let mut img = RgbImageU8::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                img.set(x, y, [(x * 30) as u8, 0, 0]);
            }
        }
        let flipped = img.flip_horizontal();
        let a = bin_spatial(&img, 8);
        let b = bin_spatial(&flipped, 8);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(a[y * 8 + x], b[y * 8 + (7 - x)]);
            }
        }
    }
}
