//! Box overlays for annotated output frames.
use super::RgbImageU8;
use crate::types::BoundingBox;

/// Draw rectangle outlines on a copy of the frame.
///
/// The border grows inward from each box edge by `thickness` pixels and is
/// clamped to the image bounds; the input frame is never mutated.
pub fn draw_boxes(
    frame: &RgbImageU8,
    boxes: &[BoundingBox],
    color: [u8; 3],
    thickness: usize,
) -> RgbImageU8 {
    let mut out = frame.clone();
    for b in boxes {
        draw_box(&mut out, *b, color, thickness.max(1));
    }
    out
}

fn draw_box(img: &mut RgbImageU8, b: BoundingBox, color: [u8; 3], thickness: usize) {
    let x0 = b.x0.min(img.w);
    let y0 = b.y0.min(img.h);
    let x1 = b.x1.min(img.w);
    let y1 = b.y1.min(img.h);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let t = thickness.min((x1 - x0).min(y1 - y0));
    for y in y0..y1 {
        let near_top = y < y0 + t;
        let near_bottom = y >= y1 - t;
        for x in x0..x1 {
            if near_top || near_bottom || x < x0 + t || x >= x1 - t {
                img.set(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::draw_boxes;
    use crate::image::RgbImageU8;
    use crate::types::BoundingBox;

    #[test]
    fn draws_border_and_leaves_interior() {
        let frame = RgbImageU8::new(20, 20);
        let out = draw_boxes(&frame, &[BoundingBox::new(4, 4, 16, 16)], [255, 0, 0], 2);
        assert_eq!(out.get(4, 4), [255, 0, 0]);
        assert_eq!(out.get(15, 15), [255, 0, 0]);
        assert_eq!(out.get(10, 10), [0, 0, 0]);
        // Input untouched.
        assert_eq!(frame.get(4, 4), [0, 0, 0]);
    }

    #[test]
    fn clamps_to_image_bounds() {
        let frame = RgbImageU8::new(8, 8);
        let out = draw_boxes(&frame, &[BoundingBox::new(6, 6, 12, 12)], [0, 255, 0], 1);
        assert_eq!(out.get(7, 7), [0, 255, 0]);
    }
}
